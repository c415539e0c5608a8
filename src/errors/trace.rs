//! Source locations recorded by each error node.
//!
//! # Design Decisions
//! - `#[track_caller]` resolves file/line/column to the code that called
//!   into this crate, never to the crate itself
//! - Module path and function name are only known at macro expansion, so
//!   they are filled by [`trace_here!`](crate::trace_here) and left empty
//!   for plain constructor calls

use std::fmt;
use std::panic::Location;

/// Where an error node was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub origin_package: Option<&'static str>,
    pub origin_file: &'static str,
    pub origin_function: Option<&'static str>,
    pub line: u32,
    pub column: u32,
    /// Developer-oriented note, usually the node's technical message.
    pub observation: Option<String>,
}

impl Trace {
    /// Captures the location of the caller.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    /// Builds a trace from a location, with no package or function.
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            origin_package: None,
            origin_file: location.file(),
            origin_function: None,
            line: location.line(),
            column: location.column(),
            observation: None,
        }
    }

    /// Builds a fully qualified trace. Used by [`trace_here!`](crate::trace_here).
    pub fn at(
        package: &'static str,
        function: &'static str,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            origin_package: Some(package),
            origin_function: Some(function),
            ..Self::from_location(location)
        }
    }

    /// `file:line` of the origin.
    pub fn location(&self) -> String {
        format!("{}:{}", self.origin_file, self.line)
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(function) = self.origin_function {
            write!(f, "{} ", function)?;
        } else if let Some(package) = self.origin_package {
            write!(f, "{} ", package)?;
        }
        write!(f, "at {}:{}:{}", self.origin_file, self.line, self.column)?;
        if let Some(observation) = &self.observation {
            write!(f, " ({})", observation)?;
        }
        Ok(())
    }
}

/// Expands to the path of the enclosing function.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// Captures a [`Trace`](crate::errors::Trace) for the current module,
/// function and line.
#[macro_export]
macro_rules! trace_here {
    () => {
        $crate::errors::Trace::at(
            ::std::module_path!(),
            $crate::__function_path!(),
            ::std::panic::Location::caller(),
        )
    };
}
