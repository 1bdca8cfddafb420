//! Trace storage for Metropolis runs.
//!
//! [`StepTraceBuilder`] collects the full per-step diagnostics into Arrow
//! arrays. [`CsvTraceWriter`] writes the chain in a CmdStan-like CSV layout
//! so that existing tooling can read it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayBuilder, ArrayRef, BooleanBuilder, Float64Builder, StructArray, UInt64Builder},
    datatypes::{DataType, Field},
};

use crate::{
    chain::{ChainError, Progress},
    metropolis::StepResult,
};

const FLOAT_COLUMNS: [&str; 11] = [
    "tau",
    "mu1",
    "mu2",
    "proposed_tau",
    "proposed_mu1",
    "proposed_mu2",
    "log_posterior_current",
    "log_posterior_proposed",
    "log_ratio",
    "acceptance_probability",
    "random_draw",
];

fn float_values(result: &StepResult) -> [f64; 11] {
    [
        result.new_params.tau,
        result.new_params.mu1,
        result.new_params.mu2,
        result.proposed.tau,
        result.proposed.mu1,
        result.proposed.mu2,
        result.log_posterior_current,
        result.log_posterior_proposed,
        result.log_ratio,
        result.acceptance_probability,
        result.random_draw,
    ]
}

/// Columnar builder for the diagnostics of every step of a chain.
pub struct StepTraceBuilder {
    draw: UInt64Builder,
    tuning: BooleanBuilder,
    accepted: BooleanBuilder,
    floats: Vec<Float64Builder>,
}

impl StepTraceBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        StepTraceBuilder {
            draw: UInt64Builder::with_capacity(capacity),
            tuning: BooleanBuilder::with_capacity(capacity),
            accepted: BooleanBuilder::with_capacity(capacity),
            floats: FLOAT_COLUMNS
                .iter()
                .map(|_| Float64Builder::with_capacity(capacity))
                .collect(),
        }
    }

    pub fn append_value(&mut self, result: &StepResult, progress: &Progress) {
        self.draw.append_value(progress.draw);
        self.tuning.append_value(progress.tuning);
        self.accepted.append_value(result.accepted);
        self.floats
            .iter_mut()
            .zip(float_values(result))
            .for_each(|(builder, value)| builder.append_value(value));
    }

    pub fn len(&self) -> usize {
        self.draw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fields() -> Vec<Field> {
        let mut fields = vec![
            Field::new("draw", DataType::UInt64, false),
            Field::new("tuning", DataType::Boolean, false),
            Field::new("accepted", DataType::Boolean, false),
        ];
        fields.extend(
            FLOAT_COLUMNS
                .iter()
                .map(|name| Field::new(*name, DataType::Float64, false)),
        );
        fields
    }

    pub fn finalize(self) -> Result<StructArray, ChainError> {
        let Self {
            mut draw,
            mut tuning,
            mut accepted,
            floats,
        } = self;

        let mut arrays: Vec<ArrayRef> = vec![
            ArrayBuilder::finish(&mut draw),
            ArrayBuilder::finish(&mut tuning),
            ArrayBuilder::finish(&mut accepted),
        ];
        arrays.extend(
            floats
                .into_iter()
                .map(|mut builder| ArrayBuilder::finish(&mut builder)),
        );

        Ok(StructArray::try_new(Self::fields().into(), arrays, None)?)
    }

    /// Snapshot of the trace so far without consuming the builder.
    pub fn inspect(&self) -> Result<StructArray, ChainError> {
        let mut arrays: Vec<ArrayRef> = vec![
            ArrayBuilder::finish_cloned(&self.draw),
            ArrayBuilder::finish_cloned(&self.tuning),
            ArrayBuilder::finish_cloned(&self.accepted),
        ];
        arrays.extend(self.floats.iter().map(ArrayBuilder::finish_cloned));

        Ok(StructArray::try_new(Self::fields().into(), arrays, None)?)
    }
}

/// CSV writer for a single chain.
///
/// Columns are `draw__, lp__, accept_stat__, accepted__, tau, mu1, mu2`,
/// where `lp__` and the parameters describe the state after the step.
/// Burn-in rows carry negative draw ids.
pub struct CsvTraceWriter<W: Write> {
    writer: W,
    precision: usize,
    store_warmup: bool,
    header_written: bool,
}

impl CsvTraceWriter<BufWriter<File>> {
    /// Create (or truncate) a CSV file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
        Ok(CsvTraceWriter::new(BufWriter::new(file)))
    }
}

impl<W: Write> CsvTraceWriter<W> {
    pub fn new(writer: W) -> Self {
        CsvTraceWriter {
            writer,
            precision: 6,
            store_warmup: true,
            header_written: false,
        }
    }

    /// Number of decimal places for floating point values. Default is 6.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Whether burn-in draws are written. Default is true.
    pub fn store_warmup(mut self, store: bool) -> Self {
        self.store_warmup = store;
        self
    }

    fn write_header(&mut self) -> Result<()> {
        if self.header_written {
            return Ok(());
        }
        writeln!(
            self.writer,
            "draw__,lp__,accept_stat__,accepted__,tau,mu1,mu2"
        )?;
        self.header_written = true;
        Ok(())
    }

    fn format_value(&self, value: f64) -> String {
        if value.is_nan() {
            "NA".to_string()
        } else if value.is_infinite() {
            let inf = if value > 0. { "Inf" } else { "-Inf" };
            inf.to_string()
        } else {
            format!("{:.prec$}", value, prec = self.precision)
        }
    }

    pub fn record(&mut self, result: &StepResult, progress: &Progress) -> Result<()> {
        if progress.tuning && !self.store_warmup {
            return Ok(());
        }
        self.write_header()?;

        let id = progress.draw as i64 + 1;
        let id = if progress.tuning { -id } else { id };
        let lp = if result.accepted {
            result.log_posterior_proposed
        } else {
            result.log_posterior_current
        };
        let row = [
            id.to_string(),
            self.format_value(lp),
            self.format_value(result.acceptance_probability),
            if result.accepted { "1" } else { "0" }.to_string(),
            self.format_value(result.new_params.tau),
            self.format_value(result.new_params.mu1),
            self.format_value(result.new_params.mu2),
        ];
        writeln!(self.writer, "{}", row.join(","))
            .context("Failed to write CSV row")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV writer")
    }

    /// Write the header if nothing was recorded, flush and return the writer.
    pub fn finish(mut self) -> Result<W> {
        self.write_header()?;
        self.flush()?;
        Ok(self.writer)
    }
}
