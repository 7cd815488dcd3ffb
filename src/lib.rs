//! # vidforge
//!
//! Seven-stage AI content pipeline for faceless video production.
//!
//! A run takes a video title and a script brief and drives seven dependent
//! generation stages (script, TTS markup, storyboard, video prompts,
//! thumbnail concepts, retention hooks, SEO metadata), one model request
//! per stage, feeding earlier outputs into later prompts. Completed runs
//! are archived locally and can be reloaded and exported.
//!
//! ## Modules
//!
//! - `cli` - Command-line surface for running the pipeline and managing history
//! - `compose` - Per-stage prompt composition with dependency wiring
//! - `config` - Provider settings and data-directory resolution
//! - `export` - Plain-text and markdown renderings of a completed run
//! - `generate` - Generation provider boundary and its failure taxonomy
//! - `pipeline` - The orchestrator and current-run session state
//! - `stage` - Static registry of the seven stages
//! - `storage` - Key-value persistence, the history archive, theme preference

pub mod cli;
pub mod compose;
pub mod config;
pub mod export;
pub mod generate;
pub mod pipeline;
pub mod stage;
pub mod storage;
