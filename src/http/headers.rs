use std::collections::HashMap;

use crate::utils::MultiValuesMap;

#[derive(Debug, Default)]
pub struct Headers {
    map: MultiValuesMap,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&self) -> Option<&HashMap<String, Vec<String>>> {
        self.map.map()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn append(&mut self, k: &str, v: &str) {
        self.map.append(k, v);
    }

    pub fn set(&mut self, k: &str, v: &str) {
        self.map.set(k, v);
    }

    pub fn remove(&mut self, k: &str) {
        self.map.remove(k);
    }

    pub fn contains(&self, k: &str) -> bool {
        self.map.contains(k)
    }

    pub fn get(&self, k: &str) -> Option<&String> {
        self.map.get(k)
    }

    pub fn get_all(&self, k: &str) -> Option<&Vec<String>> {
        self.map.get_all(k)
    }

    pub fn each<F: FnMut(&str, &Vec<String>)>(&self, mut f: F) {
        if let Some(map) = self.map.map() {
            for (k, vs) in map {
                f(k.as_str(), vs);
            }
        }
    }

    /// `None` when the header is absent, `Some(-1)` when it is unparsable.
    pub fn content_length(&self) -> Option<i64> {
        match self.get("content-length") {
            None => None,
            Some(s) => match s.trim().parse::<i64>() {
                Ok(v) => {
                    if v < 0 {
                        Some(-1)
                    } else {
                        Some(v)
                    }
                }
                Err(_) => Some(-1),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Headers;

    #[test]
    fn content_length() {
        let mut headers = Headers::new();
        assert_eq!(headers.content_length(), None);

        headers.set("Content-Length", "42");
        assert_eq!(headers.content_length(), Some(42));

        headers.set("content-length", "nope");
        assert_eq!(headers.content_length(), Some(-1));
    }
}
