use std::{
    collections::HashMap,
    fmt::{self, Debug},
    sync::{Arc, RwLock},
};
use tracing::field::Field;
use tracing_subscriber::{
    field::{RecordFields, Visit, VisitOutput},
    fmt::{
        format::{DefaultVisitor, Writer},
        FormatFields,
    },
};

lazy_static::lazy_static! {
    // Rewrites identifiers in log output so owners show up by nickname
    static ref GLOBAL_REWRITER: LogRewriter = LogRewriter::new();
}

/// Install a test-friendly subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_logging() {
    GLOBAL_REWRITER.clear_rewrites();
    let _ = tracing_subscriber::fmt::fmt()
        .fmt_fields(GLOBAL_REWRITER.clone())
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Show `to` wherever `from` would appear in a logged field.
pub fn add_rewrite<S1: ToString, S2: AsRef<str>>(from: S1, to: S2) {
    GLOBAL_REWRITER.add_rewrite(from, to);
}

#[derive(Clone)]
pub struct LogRewriter {
    rewrites: Arc<RwLock<HashMap<String, String>>>,
}

impl LogRewriter {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            rewrites: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn rewrite(&self, value: &str) -> String {
        let Ok(rewrites) = self.rewrites.read() else {
            return value.to_string();
        };

        rewrites
            .iter()
            .fold(value.to_string(), |acc, (from, to)| acc.replace(from, to))
    }

    pub fn add_rewrite<S: ToString, To: AsRef<str>>(&self, from: S, to: To) {
        if let Ok(mut rewrites) = self.rewrites.write() {
            rewrites.insert(from.to_string(), to.as_ref().to_string());
        }
    }

    pub fn clear_rewrites(&self) {
        if let Ok(mut rewrites) = self.rewrites.write() {
            rewrites.clear();
        }
    }
}

impl Debug for LogRewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRewriter").finish_non_exhaustive()
    }
}

impl<'writer> FormatFields<'writer> for LogRewriter {
    fn format_fields<R: RecordFields>(&self, writer: Writer<'writer>, fields: R) -> fmt::Result {
        let mut visitor = RewritingVisitor {
            inner: DefaultVisitor::new(writer, true),
            rewriter: self,
        };
        fields.record(&mut visitor);
        visitor.inner.finish()
    }
}

struct RewritingVisitor<'a, V> {
    inner: V,
    rewriter: &'a LogRewriter,
}

impl<V: Visit> Visit for RewritingVisitor<'_, V> {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        let shown = format!("{:?}", value);
        let rewritten = self.rewriter.rewrite(&shown);
        if rewritten != shown {
            self.inner.record_debug(field, &format_args!("{}", rewritten));
        } else {
            self.inner.record_debug(field, value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        let rewritten = self.rewriter.rewrite(value);
        self.inner.record_str(field, &rewritten);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.inner.record_u64(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.inner.record_i64(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.inner.record_bool(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.inner.record_error(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_replaces_every_occurrence() {
        let rewriter = LogRewriter::new();
        rewriter.add_rewrite("0xabc", "alice");
        assert_eq!(rewriter.rewrite("0xabc sent to 0xabc"), "alice sent to alice");

        rewriter.clear_rewrites();
        assert_eq!(rewriter.rewrite("0xabc"), "0xabc");
    }
}
