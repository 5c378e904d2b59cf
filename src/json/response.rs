//! Writing encoded documents to a response channel.
//!
//! `write_*` methods return every failure to the caller. `print_*` methods
//! are the fire-and-forget variants for handlers that have no error path:
//! a failure is logged and nothing is written.

use std::io::Write;

use log::error;

use crate::accessor::RowModel;
use crate::config::BridgeConfig;
use crate::core::{Record, Result};

use super::encoder::JsonEncoder;

pub struct JsonResponseWriter<W> {
    out: W,
    config: BridgeConfig,
}

impl<W: Write> JsonResponseWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_config(out, BridgeConfig::default())
    }

    pub fn with_config(out: W, config: BridgeConfig) -> Self {
        Self { out, config }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes one document; `None` is written as the configured absent text.
    pub fn write_document(&mut self, document: Option<&str>) -> Result<()> {
        let text = document.unwrap_or(&self.config.absent_document);
        self.out.write_all(text.as_bytes())?;
        if self.config.trailing_newline {
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let json = JsonEncoder::encode_record(record)?;
        self.write_document(Some(&json))
    }

    pub fn write_model<T, S>(&mut self, model: &T, attributes: &[S]) -> Result<()>
    where
        T: RowModel,
        S: AsRef<str>,
    {
        let json = JsonEncoder::encode_model(model, attributes)?;
        self.write_document(Some(&json))
    }

    pub fn write_records(&mut self, records: &[Record]) -> Result<()> {
        let json = JsonEncoder::encode_records(records)?;
        self.write_document(json.as_deref())
    }

    pub fn write_models<T, S>(&mut self, models: &[T], attributes: &[S]) -> Result<()>
    where
        T: RowModel,
        S: AsRef<str>,
    {
        let json = JsonEncoder::encode_models(models, attributes)?;
        self.write_document(json.as_deref())
    }

    pub fn print_record(&mut self, record: &Record) {
        let outcome = self.write_record(record);
        log_failure(outcome);
    }

    pub fn print_model<T, S>(&mut self, model: &T, attributes: &[S])
    where
        T: RowModel,
        S: AsRef<str>,
    {
        let outcome = self.write_model(model, attributes);
        log_failure(outcome);
    }

    pub fn print_records(&mut self, records: &[Record]) {
        let outcome = self.write_records(records);
        log_failure(outcome);
    }

    pub fn print_models<T, S>(&mut self, models: &[T], attributes: &[S])
    where
        T: RowModel,
        S: AsRef<str>,
    {
        let outcome = self.write_models(models, attributes);
        log_failure(outcome);
    }
}

fn log_failure(outcome: Result<()>) {
    if let Err(err) = outcome {
        error!("Couldn't write JSON response: {}", err);
    }
}
