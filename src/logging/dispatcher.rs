use std::sync::mpsc;

use tokio::io::AsyncWriteExt;

use crate::logging::appender::{Appender, Renderer};
use crate::logging::item::Item;
use crate::utils::anyhow;

enum Message {
    Flush(mpsc::Sender<()>),
    LogItem(Item),
}

struct Dispatcher {
    sx: mpsc::Sender<Message>,
}

impl log::Log for Dispatcher {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = self.sx.send(Message::LogItem(Item::from(record)));
    }

    fn flush(&self) {
        let (sx, rx) = mpsc::channel();
        if self.sx.send(Message::Flush(sx)).is_err() {
            return;
        }
        let _ = rx.recv_timeout(std::time::Duration::from_secs(1));
    }
}

struct Consumer {
    appenders: Vec<Box<dyn Appender>>,
    renderers: Vec<Box<dyn Renderer>>,
    map: Vec<usize>, // appender idx -> renderer idx
    bufs: Vec<Vec<u8>>,
}

impl Consumer {
    async fn consume(&mut self, msg: Message) {
        match msg {
            Message::Flush(ack) => {
                for appender in self.appenders.iter_mut() {
                    let _ = appender.flush().await;
                }
                let _ = ack.send(());
            }
            Message::LogItem(item) => {
                for buf in self.bufs.iter_mut() {
                    buf.clear();
                }
                let mut rendered = vec![false; self.renderers.len()];
                for (aidx, appender) in self.appenders.iter_mut().enumerate() {
                    if !appender.filter(&item) {
                        continue;
                    }
                    let ridx = self.map[aidx];
                    if !rendered[ridx] {
                        self.renderers[ridx].render(&item, &mut self.bufs[ridx]);
                        rendered[ridx] = true;
                    }
                    let _ = appender.write_all(&self.bufs[ridx]).await;
                }
            }
        }
    }
}

pub fn init(
    level: log::LevelFilter,
    appenders: Vec<Box<dyn Appender>>,
    renderers: Vec<Box<dyn Renderer>>,
) -> anyhow::Result<()> {
    if renderers.is_empty() {
        return anyhow::error("at least one renderer is required");
    }

    let mut map = Vec::with_capacity(appenders.len());
    for appender in appenders.iter() {
        let name = appender.renderer();
        if name.is_empty() {
            map.push(0);
            continue;
        }
        match renderers.iter().position(|r| r.name() == name) {
            Some(idx) => map.push(idx),
            None => return anyhow::error(&format!("renderer `{}` not found", name)),
        }
    }

    let bufs = renderers.iter().map(|_| Vec::new()).collect();
    let mut consumer = Consumer {
        appenders,
        renderers,
        map,
        bufs,
    };

    let (sx, rx) = mpsc::channel();
    anyhow::result(
        std::thread::Builder::new()
            .name("wsd-logging".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread().build() {
                    Ok(rt) => rt,
                    Err(_) => return,
                };
                rt.block_on(async move {
                    loop {
                        match rx.recv() {
                            Ok(msg) => consumer.consume(msg).await,
                            Err(_) => return,
                        }
                    }
                });
            }),
    )?;

    log::set_max_level(level);
    anyhow::result(log::set_logger(Box::leak(Box::new(Dispatcher { sx }))))
}
