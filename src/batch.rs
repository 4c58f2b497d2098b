//! Parallel extraction of many files
//!
//! Workers pull inputs from a shared channel and run independent walks;
//! each walk owns its own scope stack and `File`. Nothing is shared
//! between walks except the read-only driver.

use crate::adapter::Extracted;
use crate::driver::{Driver, SourceInput};
use crate::schema::LanguageType;
use crate::Result;
use crossbeam::channel;

/// Result for one input of a batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: String,
    pub result: Result<Extracted>,
}

/// Worker count used when none is configured
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Extract every input, returning outcomes in input order.
pub fn extract_batch(
    driver: &Driver,
    inputs: &[SourceInput],
    language: Option<LanguageType>,
    jobs: usize,
) -> Vec<BatchOutcome> {
    if inputs.is_empty() {
        return Vec::new();
    }
    let jobs = jobs.clamp(1, inputs.len());
    tracing::debug!("extracting {} file(s) on {} worker(s)", inputs.len(), jobs);

    let (work_tx, work_rx) = channel::unbounded::<(usize, &SourceInput)>();
    for item in inputs.iter().enumerate() {
        if work_tx.send(item).is_err() {
            break;
        }
    }
    drop(work_tx);

    let (done_tx, done_rx) = channel::unbounded::<(usize, BatchOutcome)>();
    let scope = crossbeam::thread::scope(|s| {
        for _ in 0..jobs {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            s.spawn(move |_| {
                for (index, input) in work_rx.iter() {
                    let outcome = BatchOutcome {
                        path: input.path.clone(),
                        result: driver.extract(input, language),
                    };
                    if done_tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    if let Err(panic) = scope {
        // A worker panicking is an adapter defect, not a per-file failure
        std::panic::resume_unwind(panic);
    }
    drop(done_tx);

    let mut outcomes: Vec<(usize, BatchOutcome)> = done_rx.iter().collect();
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn inputs() -> Vec<SourceInput> {
        (0..12)
            .map(|i| {
                if i % 4 == 3 {
                    SourceInput::new(format!("src/Svc{i}.java"), format!("class Svc{i} {{ void run{i}() {{}} }}"))
                } else {
                    SourceInput::new(format!("src/mod{i}.py"), format!("def f{i}():\n    def g{i}():\n        pass\n"))
                }
            })
            .collect()
    }

    #[test]
    fn test_batch_matches_sequential() {
        let driver = Driver::new();
        let inputs = inputs();
        let batch = extract_batch(&driver, &inputs, None, 4);
        assert_eq!(batch.len(), inputs.len());

        for (input, outcome) in inputs.iter().zip(&batch) {
            assert_eq!(outcome.path, input.path);
            let sequential = driver.extract(input, None).unwrap().file;
            let parallel = &outcome.result.as_ref().unwrap().file;
            assert_eq!(parallel, &sequential);
        }
    }

    #[test]
    fn test_failures_stay_per_file() {
        let driver = Driver::new();
        let inputs = vec![
            SourceInput::new("ok.py", "def ok():\n    pass\n"),
            SourceInput::new("bad.py", "def bad(:\n"),
            SourceInput::new("skip.txt", "plain text"),
        ];
        let batch = extract_batch(&driver, &inputs, None, 8);

        assert!(batch[0].result.is_ok());
        assert!(matches!(batch[1].result, Err(Error::UpstreamParse { .. })));
        assert!(matches!(batch[2].result, Err(Error::UnsupportedLanguage(_))));
    }

    #[test]
    fn test_deep_file_does_not_take_down_batch() {
        let deep = format!("def deep():\n    return {}1\n", "1+".repeat(50_000));
        let inputs = vec![
            SourceInput::new("deep.py", deep),
            SourceInput::new("small.py", "def small():\n    pass\n"),
        ];

        let batch = extract_batch(&Driver::new(), &inputs, None, 2);
        assert_eq!(batch.len(), 2);
        for (outcome, name) in batch.iter().zip(["deep", "small"]) {
            let file = &outcome.result.as_ref().unwrap().file;
            assert_eq!(file.functions()[0].name, name);
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(extract_batch(&Driver::new(), &[], None, 0).is_empty());
        assert!(default_jobs() >= 1);
    }
}
