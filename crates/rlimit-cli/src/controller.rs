//! Per-resource query/apply/report.
//!
//! Limits are read fresh from the [`LimitSource`] before and after every
//! change. The kernel may adjust a request without failing, so the value
//! reported is always the one read back.

use std::io::Write;

use rlimit_core::{LimitPair, LimitRequest};

use crate::config::Config;
use crate::error::RlimitError;
use crate::report;
use crate::resources::ResourceKind;
use crate::structured_log::{LogEmitter, LogLevel};
use crate::sys::LimitSource;

/// What to do with one resource named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Flag given without a value: show the current limits.
    Query,
    /// Flag given with `soft[,hard]`.
    Set(LimitRequest),
}

/// One resource flag occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub resource: &'static ResourceKind,
    pub action: Action,
}

pub struct Controller<S, W> {
    source: S,
    config: Config,
    out: W,
    log: LogEmitter,
}

impl<S: LimitSource, W: Write> Controller<S, W> {
    pub fn new(source: S, config: Config, out: W, log: LogEmitter) -> Self {
        Self {
            source,
            config,
            out,
            log,
        }
    }

    /// Fetch the current limits of `resource`.
    pub fn query(&mut self, resource: &'static ResourceKind) -> Result<LimitPair, RlimitError> {
        let pair = self
            .source
            .get(resource)
            .map_err(|source| RlimitError::Query {
                resource: resource.name,
                source,
            })?;
        if self.log.is_enabled() {
            let entry = self
                .log
                .entry(LogLevel::Debug, "limit.query")
                .with_resource(resource)
                .with_pair(pair);
            self.log.emit(&entry);
        }
        Ok(pair)
    }

    /// Apply `request` to `resource` and return the limits now in force.
    pub fn apply(
        &mut self,
        resource: &'static ResourceKind,
        request: &LimitRequest,
    ) -> Result<LimitPair, RlimitError> {
        let baseline = self.query(resource)?;
        let merged = request.merge(baseline)?;
        let target = merged.clamped();
        debug_assert!(target.is_valid());

        if target != merged && self.log.is_enabled() {
            let entry = self
                .log
                .entry(LogLevel::Warn, "limit.clamp")
                .with_resource(resource)
                .with_pair(target)
                .with_details(serde_json::json!({ "requested_soft": merged.soft }));
            self.log.emit(&entry);
        }

        self.source
            .set(resource, target)
            .map_err(|source| RlimitError::Set {
                resource: resource.name,
                soft: target.soft,
                hard: target.hard,
                source,
            })?;

        if self.log.is_enabled() {
            let entry = self
                .log
                .entry(LogLevel::Info, "limit.set")
                .with_resource(resource)
                .with_pair(target);
            self.log.emit(&entry);
        }

        self.query(resource)
    }

    /// Print the report line for `resource` unless the config suppresses it.
    pub fn report(
        &mut self,
        resource: &ResourceKind,
        pair: LimitPair,
        modified: bool,
    ) -> Result<(), RlimitError> {
        if !self.config.shows(modified) {
            return Ok(());
        }
        self.write_line(resource, pair)
    }

    /// Handle one resource flag.
    pub fn process(&mut self, request: &ResourceRequest) -> Result<(), RlimitError> {
        match &request.action {
            Action::Query => {
                let pair = self.query(request.resource)?;
                self.report(request.resource, pair, false)
            }
            Action::Set(limits) => {
                let pair = self.apply(request.resource, limits)?;
                self.report(request.resource, pair, true)
            }
        }
    }

    /// Print every resource in `resources`, ignoring verbosity.
    pub fn list_all(&mut self, resources: &'static [ResourceKind]) -> Result<(), RlimitError> {
        for resource in resources {
            let pair = self.query(resource)?;
            self.write_line(resource, pair)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), RlimitError> {
        self.out.flush().map_err(RlimitError::Output)
    }

    pub fn log_mut(&mut self) -> &mut LogEmitter {
        &mut self.log
    }

    /// Tear down, handing back the source and the output sink.
    pub fn into_parts(self) -> (S, W) {
        (self.source, self.out)
    }

    fn write_line(&mut self, resource: &ResourceKind, pair: LimitPair) -> Result<(), RlimitError> {
        let line = report::render_line(resource, pair, self.config.human_readable);
        writeln!(self.out, "{line}").map_err(RlimitError::Output)
    }
}
