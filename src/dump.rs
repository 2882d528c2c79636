//! Debug dump of a resolved parameter set.
//!
//! Renders every parameter with its type, current value and the source it
//! came from, aligned into columns. Mostly useful while wiring up a new
//! project's configuration.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::conf::Conf;
use crate::value::Value;

impl Conf {
    /// Write a human-readable listing of every parameter to `writer`.
    ///
    /// ```text
    /// baz      integer  199    environment   range 1..=200
    /// region   string   east   default       one of: east, west
    /// verbose  boolean  true   command line
    /// ```
    pub fn dump(&self, writer: &mut dyn Write) -> io::Result<()> {
        let name_width = self
            .params
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0);

        for (name, param) in &self.params {
            let ty = param.spec.param_type().to_string();
            let rendered = match &param.value {
                Some(Value::Str(s)) => format!("{}", s.green()),
                Some(Value::Int(n)) => format!("{}", n.cyan()),
                Some(Value::Bool(b)) => format!("{}", b.magenta()),
                None => format!("{}", "<unset>".dimmed()),
            };

            let mut constraints = String::new();
            if let Some(values) = param.spec.allowed_values() {
                let list: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                constraints = format!("one of: {}", list.join(", "));
            } else if let Some((min, max)) = param.spec.allowed_range() {
                constraints = format!("range {min}..={max}");
            }

            // Pad before styling so the ANSI codes do not skew the columns.
            let padded_name = format!("{name:name_width$}");
            writeln!(
                writer,
                "{}  {ty:7}  {}  {}  {}",
                padded_name.bold(),
                rendered,
                param.source.dimmed(),
                constraints.dimmed(),
            )?;
        }

        Ok(())
    }
}
