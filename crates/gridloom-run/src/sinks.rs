//! Output sinks
//!
//! Text and JSON-lines sinks for frames produced on the command line. Image
//! and voxel writers belong to dedicated encoder crates; these cover the
//! terminal workflow.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use gridloom_model::ModelDefinition;
use gridloom_runtime::{Frame, GenerationSink, RunContext, SinkError};

/// Renders final frames as rows of symbols on stdout, optionally mirroring
/// each run into a `.txt` file.
pub struct TextSink {
    output_dir: Option<PathBuf>,
}

impl TextSink {
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir }
    }
}

impl GenerationSink<char> for TextSink {
    fn begin_run(
        &mut self,
        model: &ModelDefinition<char>,
        context: &RunContext,
    ) -> Result<(), SinkError> {
        println!(
            "== {} run {} (seed {}) ==",
            model.name,
            context.run_index(),
            context.seed()
        );
        Ok(())
    }

    fn handle_frame(
        &mut self,
        model: &ModelDefinition<char>,
        context: &RunContext,
        frame: &Frame<char>,
    ) -> Result<(), SinkError> {
        if !frame.is_final() {
            return Ok(());
        }

        let rows = frame
            .to_row_strings()
            .map_err(|error| SinkError::other(error.to_string()))?;
        for row in &rows {
            println!("{row}");
        }

        if let Some(dir) = &self.output_dir {
            fs::create_dir_all(dir)?;
            let path = dir.join(format!("{}_run{}.txt", model.name, context.run_index()));
            let mut file = fs::File::create(path)?;
            for row in &rows {
                writeln!(file, "{row}")?;
            }
        }
        Ok(())
    }

    fn complete_run(
        &mut self,
        _model: &ModelDefinition<char>,
        context: &RunContext,
    ) -> Result<(), SinkError> {
        println!("== run {} complete ==", context.run_index());
        Ok(())
    }
}

/// Emits every frame as one JSON object per line on stdout.
pub struct JsonSink;

impl GenerationSink<char> for JsonSink {
    fn begin_run(
        &mut self,
        _model: &ModelDefinition<char>,
        _context: &RunContext,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    fn handle_frame(
        &mut self,
        _model: &ModelDefinition<char>,
        context: &RunContext,
        frame: &Frame<char>,
    ) -> Result<(), SinkError> {
        let line = serde_json::json!({
            "run": context.run_index(),
            "seed": context.seed(),
            "frame": frame,
        });
        println!("{line}");
        Ok(())
    }

    fn complete_run(
        &mut self,
        _model: &ModelDefinition<char>,
        _context: &RunContext,
    ) -> Result<(), SinkError> {
        Ok(())
    }
}
