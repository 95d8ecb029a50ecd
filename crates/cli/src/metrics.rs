use anyhow::Result;
use bangs_redirect::Outcome;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub(crate) struct Metrics {
    registry: Registry,
    resolutions: IntCounterVec,
    corrupt_entries: IntCounter,
    index_rows: IntGauge,
    payload_bytes: IntGauge,
}

impl Metrics {
    pub(crate) fn new() -> Result<Self> {
        let registry = Registry::new();

        let resolutions = IntCounterVec::new(
            Opts::new(
                "bangs_resolutions_total",
                "Resolved queries by how the redirect target was chosen",
            ),
            &["outcome"],
        )?;
        let corrupt_entries = IntCounter::with_opts(Opts::new(
            "bangs_corrupt_entries_total",
            "Matched index entries that could not be used for a redirect",
        ))?;
        let index_rows = IntGauge::with_opts(Opts::new(
            "bangs_index_rows",
            "Rows in the loaded bang index",
        ))?;
        let payload_bytes = IntGauge::with_opts(Opts::new(
            "bangs_payload_bytes",
            "Size of the loaded template payload",
        ))?;

        registry.register(Box::new(resolutions.clone()))?;
        registry.register(Box::new(corrupt_entries.clone()))?;
        registry.register(Box::new(index_rows.clone()))?;
        registry.register(Box::new(payload_bytes.clone()))?;

        // Export every outcome from the start, even at zero.
        for outcome in Outcome::ALL {
            resolutions.with_label_values(&[outcome.as_str()]);
        }

        Ok(Self {
            registry,
            resolutions,
            corrupt_entries,
            index_rows,
            payload_bytes,
        })
    }

    pub(crate) fn observe(&self, outcome: Outcome) {
        self.resolutions
            .with_label_values(&[outcome.as_str()])
            .inc();
        if outcome == Outcome::Corrupt {
            self.corrupt_entries.inc();
        }
    }

    pub(crate) fn set_index_size(&self, rows: usize, payload_bytes: usize) {
        self.index_rows.set(i64::try_from(rows).unwrap_or(i64::MAX));
        self.payload_bytes
            .set(i64::try_from(payload_bytes).unwrap_or(i64::MAX));
    }

    pub(crate) fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_outcome_counters() {
        let metrics = Metrics::new().unwrap();
        metrics.observe(Outcome::Matched);
        metrics.observe(Outcome::Corrupt);
        metrics.set_index_size(3, 120);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"bangs_resolutions_total{outcome="matched"} 1"#));
        assert!(text.contains(r#"bangs_resolutions_total{outcome="unknown"} 0"#));
        assert!(text.contains("bangs_corrupt_entries_total 1"));
        assert!(text.contains("bangs_index_rows 3"));
    }
}
