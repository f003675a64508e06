// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use slog::{Drain, Logger};
use std::io::Write;

/// A bunyan logger on stderr, leaving stdout to command output.
pub fn init_logger() -> Logger {
    build_logger(std::io::stderr())
}

pub fn build_logger<W: Write + Send + 'static>(w: W) -> Logger {
    let drain = slog_bunyan::new(w).build().fuse();
    let drain = slog_async::Async::new(drain)
        .chan_size(0x8000)
        .build()
        .fuse();
    slog::Logger::root(drain, slog::o!())
}

/// A logger that drops every record.
pub fn discard_logger() -> Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}

macro_rules! config_log {
    ($log:expr, $level:ident, $unit:expr, $msg:expr; $($key:expr => $value:expr),*) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_POOL_CONFIG,
            "unit" => $unit,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $unit:expr, $msg:expr, $($args:expr),*; $($key:expr => $value:expr),*) => {
        slog::$level!($log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_POOL_CONFIG,
            "unit" => $unit,
            $($key => $value),*
        )
    };
}

pub(crate) use config_log;

#[cfg(test)]
mod test {
    use super::*;
    use crate::ConfigParser;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn records_are_tagged() {
        let sink = Sink::default();
        let parser = ConfigParser::new(build_logger(sink.clone()));
        parser
            .parse(b"address-pools:\n- name: pool1\n  cidr: [10.0.0.0/24]\n")
            .unwrap();
        assert!(parser.parse(b"address-pools:\n-\n").is_err());
        // Dropping the last logger handle flushes the async drain.
        drop(parser);

        let out = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("\"component\":\"pool-config\""), "{out}");
        assert!(out.contains("configuration loaded"), "{out}");
        assert!(out.contains("configuration rejected"), "{out}");
    }

    #[test]
    fn stderr_logger_accepts_records() {
        let parser = ConfigParser::new(init_logger());
        let c = parser
            .parse(b"communities:\n  bar: 64512:1234\n")
            .unwrap();
        assert!(c.pools.is_empty());
        assert!(parser.parse(b"peers:\n-\n").is_err());
    }
}
