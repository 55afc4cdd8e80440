//! Demo engine
//!
//! A deliberately tiny rewrite engine for the CLI: random flood growth of a
//! single symbol from an origin cell. It exists to exercise the full
//! session/runner/sink path; real engines live behind the same contract in
//! their own crates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gridloom_model::{ModelCatalog, ModelDefinition};
use gridloom_runtime::{CellChange, CompileError, GridView, Interpreter, InterpreterFactory, compile_grid};

const GROWN: u8 = 0; // 'B'
const EMPTY: u8 = 1; // 'W'

/// Random growth over a 2D grid: each step converts one empty neighbour of
/// the grown region.
pub struct GrowthInterpreter {
    width: usize,
    height: usize,
    legend: Vec<char>,
    origin: bool,
    state: Vec<u8>,
    log: Vec<CellChange>,
    rng: StdRng,
    steps_done: usize,
    step_budget: usize,
    emit_intermediates: bool,
    yielded_final: bool,
    primed: bool,
}

impl GrowthInterpreter {
    fn new(width: usize, height: usize, legend: Vec<char>, origin: bool) -> Self {
        Self {
            width,
            height,
            legend,
            origin,
            state: vec![EMPTY; width * height],
            log: Vec::new(),
            rng: StdRng::seed_from_u64(0),
            steps_done: 0,
            step_budget: 0,
            emit_intermediates: true,
            yielded_final: false,
            primed: false,
        }
    }

    fn view(&self) -> GridView<'_, char> {
        GridView {
            state: &self.state,
            legend: &self.legend,
            width: self.width,
            height: self.height,
            depth: 1,
        }
    }

    /// Empty cells 4-adjacent to the grown region.
    fn frontier(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.state[x + y * self.width] != EMPTY {
                    continue;
                }
                let mut adjacent = false;
                if x > 0 && self.state[x - 1 + y * self.width] == GROWN {
                    adjacent = true;
                }
                if x + 1 < self.width && self.state[x + 1 + y * self.width] == GROWN {
                    adjacent = true;
                }
                if y > 0 && self.state[x + (y - 1) * self.width] == GROWN {
                    adjacent = true;
                }
                if y + 1 < self.height && self.state[x + (y + 1) * self.width] == GROWN {
                    adjacent = true;
                }
                if adjacent {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// Perform one growth step. Returns false once nothing can grow or the
    /// budget is spent.
    fn advance(&mut self) -> bool {
        if self.steps_done >= self.step_budget {
            return false;
        }
        let frontier = self.frontier();
        if frontier.is_empty() {
            return false;
        }
        let (x, y) = frontier[self.rng.random_range(0..frontier.len())];
        self.state[x + y * self.width] = GROWN;
        self.log.push(CellChange::new(x, y, 0));
        self.steps_done += 1;
        true
    }
}

impl Interpreter<char> for GrowthInterpreter {
    fn begin_run(&mut self, seed: u64, step_budget: usize, emit_intermediates: bool) {
        self.state = vec![EMPTY; self.width * self.height];
        self.log.clear();
        self.rng = StdRng::seed_from_u64(seed);
        self.steps_done = 0;
        self.step_budget = step_budget;
        self.emit_intermediates = emit_intermediates;
        self.yielded_final = false;
        self.primed = false;

        // Seed the first grown cell: the grid centre for origin models, a
        // random cell otherwise.
        let (x, y) = if self.origin {
            (self.width / 2, self.height / 2)
        } else {
            (
                self.rng.random_range(0..self.width),
                self.rng.random_range(0..self.height),
            )
        };
        self.state[x + y * self.width] = GROWN;
        self.log.push(CellChange::new(x, y, 0));
    }

    fn poll_step(&mut self) -> Option<GridView<'_, char>> {
        if self.emit_intermediates {
            if !self.primed {
                self.primed = true;
                return Some(self.view());
            }
            if self.advance() {
                return Some(self.view());
            }
            None
        } else {
            if self.yielded_final {
                return None;
            }
            while self.advance() {}
            self.yielded_final = true;
            Some(self.view())
        }
    }

    fn change_log(&self) -> &[CellChange] {
        &self.log
    }
}

/// Factory compiling growth models. The grid must carry the `B` and `W`
/// symbols the growth rule rewrites.
pub struct GrowthFactory;

impl InterpreterFactory<char> for GrowthFactory {
    fn create_interpreter(
        &self,
        model: &ModelDefinition<char>,
    ) -> Result<Box<dyn Interpreter<char>>, CompileError> {
        let grid = compile_grid(&model.grid)?;
        for required in ['B', 'W'] {
            if grid.palette.try_index_of(&required).is_none() {
                return Err(CompileError::Model(format!(
                    "growth models need symbol '{required}' in the alphabet"
                )));
            }
        }
        if grid.depth != 1 {
            return Err(CompileError::Model(
                "growth models are two-dimensional".to_string(),
            ));
        }

        Ok(Box::new(GrowthInterpreter::new(
            grid.width,
            grid.height,
            grid.palette.symbols().to_vec(),
            model.origin,
        )))
    }
}

/// The models this binary ships with.
pub struct DemoCatalog {
    models: Vec<ModelDefinition<char>>,
}

impl DemoCatalog {
    pub fn new(models: Vec<ModelDefinition<char>>) -> Self {
        Self { models }
    }
}

impl ModelCatalog<char> for DemoCatalog {
    fn find(&self, name: &str) -> Option<&ModelDefinition<char>> {
        self.models.iter().find(|model| model.name == name)
    }

    fn names(&self) -> Vec<&str> {
        self.models.iter().map(|model| model.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gridloom_model::{ExecutionSettings, GridDefinition};
    use gridloom_runtime::{CaptureOptions, SessionOptions, capture_run};

    fn model() -> ModelDefinition<char> {
        ModelDefinition::new(
            "growth",
            GridDefinition::with_charset(7, 5, 1, "BW").unwrap(),
            ExecutionSettings::single_run(),
        )
        .with_origin(true)
    }

    #[test]
    fn growth_is_deterministic_per_seed() {
        let model = model();
        let options = || CaptureOptions {
            seed: Some(11),
            session: SessionOptions {
                emit_intermediate_frames: Some(false),
                max_steps: Some(12),
            },
            ..CaptureOptions::default()
        };

        let first = capture_run(&model, &GrowthFactory, options()).unwrap();
        let second = capture_run(&model, &GrowthFactory, options()).unwrap();
        assert_eq!(
            first.final_frame().state(),
            second.final_frame().state()
        );
    }

    #[test]
    fn growth_stops_at_step_budget() {
        let model = model();
        let output = capture_run(
            &model,
            &GrowthFactory,
            CaptureOptions {
                seed: Some(3),
                capture_intermediate: true,
                session: SessionOptions {
                    emit_intermediate_frames: Some(true),
                    max_steps: Some(4),
                },
            },
        )
        .unwrap();

        // Origin frame plus four growth steps.
        assert_eq!(output.frames().len(), 5);
        let grown = output
            .final_frame()
            .state()
            .iter()
            .filter(|&&cell| cell == GROWN)
            .count();
        assert_eq!(grown, 5);
    }

    #[test]
    fn growth_fills_the_grid_and_terminates() {
        let model = model();
        let output = capture_run(
            &model,
            &GrowthFactory,
            CaptureOptions {
                seed: Some(5),
                session: SessionOptions {
                    emit_intermediate_frames: Some(false),
                    max_steps: None,
                },
                ..CaptureOptions::default()
            },
        )
        .unwrap();

        assert!(output.final_frame().is_final());
        assert!(
            output
                .final_frame()
                .state()
                .iter()
                .all(|&cell| cell == GROWN)
        );
    }

    #[test]
    fn missing_symbols_fail_compilation() {
        let bad = ModelDefinition::new(
            "bad",
            GridDefinition::with_charset(4, 4, 1, "XY").unwrap(),
            ExecutionSettings::single_run(),
        );
        assert!(GrowthFactory.create_interpreter(&bad).is_err());
    }
}
