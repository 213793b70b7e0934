#![allow(dead_code)]

use pyscall::{Element, Runtime, documents::MemoryDocument};
use std::{
    collections::HashMap,
    sync::mpsc::{Receiver, channel},
};

// ============================================================================
// Simulated page interpreter
// ============================================================================

/// Code run when an injected element "executes".
pub type Program = Box<dyn Fn(&Runtime) + Send + Sync>;

/// Stands in for the base runtime: queues appended scripts and runs them on
/// demand, so tests control when loaded code registers its callbacks.
pub struct Interpreter {
    queue: Receiver<Element>,
    programs: HashMap<String, Program>,
    executed: Vec<String>,
}

/// A document wired to a fresh interpreter.
pub fn page() -> (MemoryDocument, Interpreter) {
    let (tx, rx) = channel();
    let document = MemoryDocument::with_executor(move |element| {
        let _ = tx.send(element.clone());
    });
    let interpreter = Interpreter {
        queue: rx,
        programs: HashMap::new(),
        executed: Vec::new(),
    };
    (document, interpreter)
}

impl Interpreter {
    /// Attach the program run for a script `src` or an inline code body.
    pub fn program(mut self, key: &str, program: impl Fn(&Runtime) + Send + Sync + 'static) -> Self {
        self.programs.insert(key.to_string(), Box::new(program));
        self
    }

    /// Execute every queued script, returning how many had a program.
    pub fn run_pending(&mut self, runtime: &Runtime) -> usize {
        let mut ran = 0;
        while let Ok(element) = self.queue.try_recv() {
            let key = match &element {
                Element::ExternalScript { src, .. } => src.clone(),
                Element::InlineScript { code, .. } => code.clone(),
                Element::ModuleScript { src } => src.clone(),
                Element::Stylesheet { .. } => continue,
            };
            if let Some(program) = self.programs.get(&key) {
                program(runtime);
                ran += 1;
            }
            self.executed.push(key);
        }
        ran
    }

    /// Keys of every script executed so far, in order.
    pub fn executed(&self) -> &[String] {
        &self.executed
    }
}
