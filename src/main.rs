//! # mysqldumper
//!
//! A multi-threaded utility that dumps the full contents of a single MySQL
//! table into gzip-compressed CSV slices. Row ranges are planned up front
//! and processed independently by a fixed pool of workers, overlapping
//! database reads with compression and writing.
//!
//! Failures are isolated per range: one bad window never stops the others,
//! and every range reports its own outcome in the final summary.

mod config;
mod dumper;
mod error;
mod exporter;
mod mysql_source;
mod planner;
mod pool;
mod report;
mod source;

use crate::config::{CliArgs, DumpSettings};
use crate::dumper::Dumper;
use crate::mysql_source::MysqlSource;
use clap::Parser;
use log::error;
use std::process;
use std::sync::Arc;
use std::time::Instant;

fn main() {
    env_logger::init();

    let args = CliArgs::parse();
    let settings = DumpSettings::from_cli(&args);
    if let Err(e) = settings.validate() {
        error!("{}", e);
        process::exit(1);
    }

    let source = match MysqlSource::connect(&args.db_url, &settings.table) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(&settings.output_dir) {
        error!("Cannot create output directory: {}", e);
        process::exit(1);
    }

    let started = Instant::now();
    let dumper = Dumper::new(source, &settings);
    match dumper.dump(&settings.output_dir) {
        Ok(report) => {
            for outcome in report.outcomes() {
                println!("{}", outcome.summary_line());
            }
            if let Err(e) = report.write_json(&settings.output_dir, started.elapsed().as_secs_f64())
            {
                error!("Failed to write run report: {}", e);
            }
        }
        Err(e) => {
            error!("Dump failed: {}", e);
            process::exit(1);
        }
    }
}
