use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MultiValuesMap {
    pub(crate) _map: Option<HashMap<String, Vec<String>>>,
    pub(crate) case_sensitive: bool,
}

impl MultiValuesMap {
    pub fn map(&self) -> Option<&HashMap<String, Vec<String>>> {
        self._map.as_ref()
    }

    pub fn clear(&mut self) {
        if let Some(map) = &mut self._map {
            map.clear();
        }
    }

    pub fn len(&self) -> usize {
        match &self._map {
            Some(map) => map.len(),
            None => 0,
        }
    }

    fn _do_append(&mut self, key: &str, val: &str) {
        match &mut self._map {
            None => {
                let mut map = HashMap::new();
                map.insert(key.to_string(), vec![val.to_string()]);
                self._map = Some(map);
            }
            Some(map) => match map.get_mut(key) {
                None => {
                    map.insert(key.to_string(), vec![val.to_string()]);
                }
                Some(vec) => {
                    vec.push(val.to_string());
                }
            },
        }
    }

    pub fn append(&mut self, key: &str, val: &str) {
        if self.case_sensitive {
            self._do_append(key, val);
            return;
        }
        self._do_append(key.to_ascii_lowercase().as_str(), val);
    }

    pub fn set(&mut self, key: &str, val: &str) {
        let k: String;
        if self.case_sensitive {
            k = key.to_string();
        } else {
            k = key.to_ascii_lowercase();
        }
        let key = k.as_str();

        match &mut self._map {
            None => {
                self._do_append(key, val);
            }
            Some(map) => match map.get_mut(key) {
                None => {
                    map.insert(k, vec![val.to_string()]);
                }
                Some(vec) => {
                    vec.clear();
                    vec.push(val.to_string());
                }
            },
        }
    }

    fn lookup(&self, key: &str) -> Option<&Vec<String>> {
        let map = self._map.as_ref()?;
        if self.case_sensitive {
            return map.get(key);
        }
        map.get(key.to_ascii_lowercase().as_str())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        match self.lookup(key) {
            None => None,
            Some(vec) => vec.first(),
        }
    }

    pub fn get_all(&self, key: &str) -> Option<&Vec<String>> {
        self.lookup(key)
    }

    pub fn remove(&mut self, key: &str) {
        let k: String;
        let key = if self.case_sensitive {
            key
        } else {
            k = key.to_ascii_lowercase();
            k.as_str()
        };
        if let Some(map) = &mut self._map {
            map.remove(key);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }
}
