//! Bench session driver
//!
//! One session covers one piped swift-bench run: idle markers for every
//! method at open and at close (the sink sees the methods go quiet), a
//! pass-through echo of every input line, and one posted document per
//! parsed reading. A refused document is a warning and the session keeps
//! going; the pipe must not die because the sink did.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::bench::{self, BenchSample, Method};
use crate::error::Result;
use crate::sink::Sink;

/// What one session did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Documents accepted by the sink, idle markers included
    pub posted: usize,
    /// Documents the sink refused or never received
    pub failed: usize,
}

/// Runs one session over `input`, echoing every line to `echo`.
pub async fn run_session<R, W>(sink: &Sink, input: R, echo: &mut W) -> Result<SessionReport>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut report = SessionReport::default();
    post_idle_markers(sink, &mut report).await;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        writeln!(echo, "{}", line.trim())?;
        let Some(sample) = bench::parse_bench_line(&line) else {
            continue;
        };
        post_logged(sink, &sample, &mut report).await;
    }

    post_idle_markers(sink, &mut report).await;
    debug!(posted = report.posted, failed = report.failed, "session finished");
    Ok(report)
}

async fn post_idle_markers(sink: &Sink, report: &mut SessionReport) {
    for method in Method::ALL {
        post_logged(sink, &BenchSample::idle(method), report).await;
    }
}

async fn post_logged(sink: &Sink, sample: &BenchSample, report: &mut SessionReport) {
    match sink.post(sample).await {
        Ok(()) => report.posted += 1,
        Err(e) => {
            report.failed += 1;
            warn!(
                method = sample.method.as_str(),
                error = %e,
                "failed to deliver metric document"
            );
        }
    }
}
