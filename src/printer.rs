//! Printer: a tree-walking visitor that hands formatted fields to a
//! caller-supplied sink, per §4.11's "treat the printer as an external
//! collaborator given a trait" framing.
//!
//! A message type does not know how to print itself; it drives a
//! [`PrinterSink`] the same way [`crate::octet::Encoder`] drives a buffer,
//! calling `on_container`/`on_value`/`on_custom` once per field in
//! declaration order. This mirrors the local-trait pattern in
//! `rustyasn::traits` (`GetConfig`, `SetField`): the collaborator is a
//! trait object, not a concrete type baked into the engine.

use smartstring::{LazyCompact, SmartString};

type FixString = SmartString<LazyCompact>;

/// Receives callbacks as a [`Printer`] walks a message tree.
///
/// Implementors typically buffer output (a `String`, a `Vec<u8>`, a
/// `std::fmt::Formatter`) and return `Ok(())`/`Err(())` to indicate whether
/// printing should continue.
pub trait PrinterSink {
    /// Called on entering a container (Sequence/Set/Choice) named `name` at
    /// `depth`.
    fn on_container(&mut self, depth: usize, name: &str);

    /// Called for a leaf IE's value once formatted to `rendered`.
    fn on_value(&mut self, depth: usize, name: &str, rendered: &str);

    /// Called when a field supplies its own `print(buf)` formatting instead
    /// of the default value rendering.
    fn on_custom(&mut self, depth: usize, name: &str, rendered: &str);

    /// Called when a field could not be rendered (e.g. an unset mandatory
    /// IE reached mid-walk); the walk continues past it.
    fn on_error(&mut self, message: &str);
}

/// A sink writing an indented plain-text tree into an owned string, the
/// default collaborator for ad hoc debugging.
#[derive(Debug, Default)]
pub struct TextSink {
    /// Accumulated output.
    pub out: String,
}

impl PrinterSink for TextSink {
    fn on_container(&mut self, depth: usize, name: &str) {
        self.out.push_str(&"  ".repeat(depth));
        self.out.push_str(name);
        self.out.push_str(":\n");
    }

    fn on_value(&mut self, depth: usize, name: &str, rendered: &str) {
        self.out.push_str(&"  ".repeat(depth));
        self.out.push_str(name);
        self.out.push_str(" = ");
        self.out.push_str(rendered);
        self.out.push('\n');
    }

    fn on_custom(&mut self, depth: usize, name: &str, rendered: &str) {
        self.on_value(depth, name, rendered);
    }

    fn on_error(&mut self, message: &str) {
        self.out.push_str("<error: ");
        self.out.push_str(message);
        self.out.push_str(">\n");
    }
}

/// Drives a [`PrinterSink`] over a message tree, honoring an optional depth
/// limit for partial printing.
pub struct Printer<'s, S: PrinterSink> {
    sink: &'s mut S,
    depth_limit: Option<usize>,
}

impl<'s, S: PrinterSink> Printer<'s, S> {
    /// Builds a printer with no depth limit.
    pub fn new(sink: &'s mut S) -> Self {
        Self { sink, depth_limit: None }
    }

    /// Builds a printer that stops descending past `limit` levels.
    pub fn with_depth_limit(sink: &'s mut S, limit: usize) -> Self {
        Self { sink, depth_limit: Some(limit) }
    }

    /// True once `depth` has reached the configured limit, if any.
    pub fn at_limit(&self, depth: usize) -> bool {
        self.depth_limit.is_some_and(|limit| depth >= limit)
    }

    /// Enters a container at `depth`, returning whether the caller should
    /// continue printing its children.
    pub fn enter_container(&mut self, depth: usize, name: &str) -> bool {
        if self.at_limit(depth) {
            return false;
        }
        self.sink.on_container(depth, name);
        true
    }

    /// Prints a leaf value formatted with `Display`.
    pub fn value(&mut self, depth: usize, name: &str, value: &dyn std::fmt::Display) {
        if self.at_limit(depth) {
            return;
        }
        let rendered: FixString = format!("{value}").into();
        self.sink.on_value(depth, name, &rendered);
    }

    /// Prints a leaf value using its own custom formatter rather than
    /// `Display`, per §4.11's "a field may provide a custom print(buf)".
    pub fn custom(&mut self, depth: usize, name: &str, format: impl FnOnce() -> String) {
        if self.at_limit(depth) {
            return;
        }
        let rendered = format();
        self.sink.on_custom(depth, name, &rendered);
    }

    /// Reports a field that could not be rendered, without aborting the
    /// walk.
    pub fn error(&mut self, message: &str) {
        self.sink.on_error(message);
    }
}
