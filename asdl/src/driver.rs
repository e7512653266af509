use codespan_reporting::diagnostic::{Diagnostic, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{BufferedStandardStream, ColorChoice, WriteColor};
use std::cell::RefCell;
use std::io::{Read, Write};
use std::path::Path;

use crate::ast::Module;
use crate::{check, parser};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Error => 1,
        }
    }
}

/// Loads ASDL descriptions, runs them through the parser and checker, and
/// renders the results.
pub struct Driver {
    files: SimpleFiles<String, String>,

    seen_errors: RefCell<bool>,
    codespan_config: codespan_reporting::term::Config,
    diagnostic_writer: RefCell<Box<dyn WriteColor>>,

    emit_writer: RefCell<Box<dyn WriteColor>>,
}

impl Driver {
    pub fn new() -> Driver {
        Driver {
            files: SimpleFiles::new(),

            seen_errors: RefCell::new(false),
            codespan_config: codespan_reporting::term::Config::default(),
            diagnostic_writer: RefCell::new(Box::new(BufferedStandardStream::stderr(
                if atty::is(atty::Stream::Stderr) {
                    ColorChoice::Auto
                } else {
                    ColorChoice::Never
                },
            ))),

            emit_writer: RefCell::new(Box::new(BufferedStandardStream::stdout(
                if atty::is(atty::Stream::Stdout) {
                    ColorChoice::Auto
                } else {
                    ColorChoice::Never
                },
            ))),
        }
    }

    /// Set the writer to use when rendering diagnostics
    pub fn set_diagnostic_writer(&mut self, stream: impl 'static + WriteColor) {
        self.diagnostic_writer = RefCell::new(Box::new(stream) as Box<dyn WriteColor>);
    }

    /// Set the writer to use when emitting parsed modules
    pub fn set_emit_writer(&mut self, stream: impl 'static + WriteColor) {
        self.emit_writer = RefCell::new(Box::new(stream) as Box<dyn WriteColor>);
    }

    /// Returns true if an error diagnostic has been emitted.
    pub fn seen_errors(&self) -> bool {
        *self.seen_errors.borrow()
    }

    /// Load a source string into the file database.
    pub fn load_source_string(&mut self, name: String, source: String) -> usize {
        self.files.add(name, source)
    }

    /// Load a source file into the file database using a reader.
    pub fn load_source(&mut self, name: String, mut reader: impl Read) -> Option<usize> {
        let mut source = String::new();
        match reader.read_to_string(&mut source) {
            Ok(_) => Some(self.load_source_string(name, source)),
            Err(error) => {
                self.emit_read_diagnostic(name, error);
                None
            }
        }
    }

    /// Load a source file into the file database from the given path.
    pub fn load_source_path(&mut self, path: &Path) -> Option<usize> {
        match std::fs::File::open(path) {
            Ok(file) => self.load_source(path.display().to_string(), file),
            Err(error) => {
                self.emit_read_diagnostic(path.display(), error);
                None
            }
        }
    }

    /// Parse a module, printing it to the emit writer.
    pub fn parse_and_emit_module(&mut self, file_id: usize) -> Status {
        let module = match self.parse_module(file_id) {
            Some(module) => module,
            None => return Status::Error,
        };

        let mut emit_writer = self.emit_writer.borrow_mut();
        let result = writeln!(emit_writer, "{module}").and_then(|()| emit_writer.flush());
        match result {
            Ok(()) => Status::Ok,
            Err(error) => {
                tracing::error!(%error, "failed to emit module");
                Status::Error
            }
        }
    }

    /// Parse and check a module, rendering a diagnostic for every problem.
    pub fn check_module(&mut self, file_id: usize) -> Status {
        let module = match self.parse_module(file_id) {
            Some(module) => module,
            None => return Status::Error,
        };

        let result = check::check_module(&module, &mut |message| {
            self.emit_diagnostic(message.to_diagnostic(file_id));
        });

        match result {
            Ok(true) => Status::Ok,
            Ok(false) => Status::Error,
            Err(error) => {
                self.emit_diagnostic(
                    Diagnostic::bug()
                        .with_message("failed to check module")
                        .with_notes(vec![error.to_string()]),
                );
                Status::Error
            }
        }
    }

    fn parse_module(&self, file_id: usize) -> Option<Module> {
        let source = match self.files.get(file_id) {
            Ok(file) => file.source(),
            Err(error) => {
                self.emit_diagnostic(Diagnostic::bug().with_message(error.to_string()));
                return None;
            }
        };

        match parser::parse(source) {
            Ok(module) => Some(module),
            Err(error) => {
                self.emit_diagnostic(error.to_diagnostic(file_id));
                None
            }
        }
    }

    fn emit_diagnostic(&self, diagnostic: Diagnostic<usize>) {
        let mut writer = self.diagnostic_writer.borrow_mut();
        let config = &self.codespan_config;

        let result = codespan_reporting::term::emit(&mut *writer, config, &self.files, &diagnostic)
            .map_err(|error| error.to_string())
            .and_then(|()| writer.flush().map_err(|error| error.to_string()));
        if let Err(error) = result {
            tracing::error!(%error, "failed to emit diagnostic");
        }

        if diagnostic.severity >= Severity::Error {
            *self.seen_errors.borrow_mut() = true;
        }
    }

    fn emit_read_diagnostic(&self, name: impl std::fmt::Display, error: std::io::Error) {
        let diagnostic =
            Diagnostic::error().with_message(format!("couldn't read `{name}`: {error}"));
        self.emit_diagnostic(diagnostic);
    }
}

impl Default for Driver {
    fn default() -> Self {
        Driver::new()
    }
}
