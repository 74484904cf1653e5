//! Declarative option specs, host-side parsing, and the `Action` contract.
//!
//! Actions never touch argv. They declare [`OptionSpec`]s against a
//! [`ParserBuilder`] supplied by the host; the host parses, validates, and
//! only then calls [`Action::run`] with the immutable [`ParsedOptions`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches};

use crate::client::{AppContext, CliError, CliResult, ExitStatus};
use crate::validate::Validator;

/// Value policy of a declared option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OptionKind {
    /// Single string value.
    Value,
    /// Boolean presence flag; absent means unset, not false.
    Flag,
    /// Repeatable string value, collected in argv order.
    Append,
    /// Repeatable string value where each occurrence is bound to the most
    /// recent prior occurrence of the `tag` option.
    TaggedAppend {
        /// Destination key of the tag option.
        tag: &'static str,
    },
}

/// A single declared option.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OptionSpec {
    pub(crate) flag: &'static str,
    pub(crate) aliases: &'static [&'static str],
    pub(crate) dest: &'static str,
    pub(crate) help: &'static str,
    pub(crate) kind: OptionKind,
}

impl OptionSpec {
    pub(crate) const fn value(flag: &'static str, help: &'static str) -> Self {
        Self {
            flag,
            aliases: &[],
            dest: flag,
            help,
            kind: OptionKind::Value,
        }
    }

    pub(crate) const fn switch(flag: &'static str, help: &'static str) -> Self {
        Self {
            flag,
            aliases: &[],
            dest: flag,
            help,
            kind: OptionKind::Flag,
        }
    }

    pub(crate) const fn append(flag: &'static str, help: &'static str) -> Self {
        Self {
            flag,
            aliases: &[],
            dest: flag,
            help,
            kind: OptionKind::Append,
        }
    }

    pub(crate) const fn tagged(flag: &'static str, tag: &'static str, help: &'static str) -> Self {
        Self {
            flag,
            aliases: &[],
            dest: flag,
            help,
            kind: OptionKind::TaggedAppend { tag },
        }
    }

    /// Store the parsed value under a key different from the flag name.
    pub(crate) const fn with_dest(mut self, dest: &'static str) -> Self {
        self.dest = dest;
        self
    }

    /// Accept additional flag spellings.
    pub(crate) const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// One parsed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OptionValue {
    /// Single value.
    Str(String),
    /// Repeated values in argv order.
    List(Vec<String>),
    /// Repeated values bound to their tag.
    Tagged(Vec<TaggedValue>),
    /// Present boolean flag.
    Bool(bool),
}

/// A repeated value together with the tag it was bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaggedValue {
    pub(crate) value: String,
    pub(crate) tag: String,
}

/// Immutable option map for one invocation. Absent keys are unset, which is
/// distinct from empty or false.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ParsedOptions {
    values: BTreeMap<String, OptionValue>,
}

impl ParsedOptions {
    pub(crate) fn set(&mut self, dest: impl Into<String>, value: OptionValue) {
        self.values.insert(dest.into(), value);
    }

    pub(crate) fn is_set(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    pub(crate) fn get_str(&self, dest: &str) -> Option<&str> {
        match self.values.get(dest) {
            Some(OptionValue::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Fetch a value the validator has already guaranteed to be present.
    pub(crate) fn required(&self, dest: &str) -> CliResult<&str> {
        self.get_str(dest).ok_or_else(|| CliError::MissingOptions {
            flags: vec![format!("--{dest}")],
        })
    }

    pub(crate) fn get_list(&self, dest: &str) -> &[String] {
        match self.values.get(dest) {
            Some(OptionValue::List(values)) => values,
            _ => &[],
        }
    }

    pub(crate) fn get_tagged(&self, dest: &str) -> &[TaggedValue] {
        match self.values.get(dest) {
            Some(OptionValue::Tagged(values)) => values,
            _ => &[],
        }
    }

    pub(crate) fn get_flag(&self, dest: &str) -> bool {
        matches!(self.values.get(dest), Some(OptionValue::Bool(true)))
    }
}

/// Outcome of parsing an action's argument list.
pub(crate) enum ParseOutcome {
    /// Options parsed; proceed to validation.
    Options(ParsedOptions),
    /// The user asked for help; render and stop.
    Help(String),
}

/// Collects an action's option declarations and parses argv against them.
pub(crate) struct ParserBuilder {
    name: String,
    about: String,
    specs: Vec<OptionSpec>,
}

impl ParserBuilder {
    pub(crate) fn new(name: impl Into<String>, about: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: about.into(),
            specs: Vec::new(),
        }
    }

    /// Register an option. Destination keys must be unique per parser.
    pub(crate) fn opt(&mut self, spec: OptionSpec) -> &mut Self {
        assert!(
            self.specs.iter().all(|existing| existing.dest != spec.dest),
            "duplicate option destination '{}'",
            spec.dest
        );
        self.specs.push(spec);
        self
    }

    /// Parse an argument list into [`ParsedOptions`].
    pub(crate) fn parse(&self, args: &[String]) -> CliResult<ParseOutcome> {
        let matches = match self.to_clap().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(err) if err.kind() == clap::error::ErrorKind::DisplayHelp => {
                return Ok(ParseOutcome::Help(err.to_string()));
            }
            Err(err) => {
                let text = err.to_string();
                let text = text.strip_prefix("error: ").unwrap_or(&text);
                return Err(CliError::InvalidOption(text.trim_end().to_string()));
            }
        };
        Ok(ParseOutcome::Options(self.collect(&matches)?))
    }

    fn to_clap(&self) -> clap::Command {
        let mut command = clap::Command::new(self.name.clone())
            .about(self.about.clone())
            .no_binary_name(true)
            .disable_version_flag(true);
        for spec in &self.specs {
            let mut arg = Arg::new(spec.dest).long(spec.flag).help(spec.help);
            for alias in spec.aliases {
                arg = arg.alias(*alias);
            }
            arg = match spec.kind {
                OptionKind::Flag => arg.action(ArgAction::SetTrue),
                OptionKind::Value => arg.action(ArgAction::Set).value_name("VALUE"),
                OptionKind::Append | OptionKind::TaggedAppend { .. } => {
                    arg.action(ArgAction::Append).value_name("VALUE")
                }
            };
            command = command.arg(arg);
        }
        command
    }

    fn collect(&self, matches: &ArgMatches) -> CliResult<ParsedOptions> {
        let mut options = ParsedOptions::default();
        for spec in &self.specs {
            match spec.kind {
                OptionKind::Flag => {
                    if matches.get_flag(spec.dest) {
                        options.set(spec.dest, OptionValue::Bool(true));
                    }
                }
                OptionKind::Value => {
                    if let Some(value) = matches.get_one::<String>(spec.dest) {
                        options.set(spec.dest, OptionValue::Str(value.clone()));
                    }
                }
                OptionKind::Append => {
                    if let Some(values) = matches.get_many::<String>(spec.dest) {
                        options.set(spec.dest, OptionValue::List(values.cloned().collect()));
                    }
                }
                OptionKind::TaggedAppend { tag } => {
                    let items = self.collect_tagged(matches, spec, tag)?;
                    if !items.is_empty() {
                        options.set(spec.dest, OptionValue::Tagged(items));
                    }
                }
            }
        }
        Ok(options)
    }

    /// Bind each occurrence of a tagged option to the closest preceding tag
    /// occurrence, walking argv indices in order.
    fn collect_tagged(
        &self,
        matches: &ArgMatches,
        spec: &OptionSpec,
        tag: &'static str,
    ) -> CliResult<Vec<TaggedValue>> {
        let tag_flag = self
            .specs
            .iter()
            .find(|candidate| candidate.dest == tag)
            .map(|candidate| candidate.flag)
            .unwrap_or_else(|| panic!("option '--{}' references unregistered tag '{tag}'", spec.flag));

        let tags = indexed_values(matches, tag);
        let mut items = Vec::new();
        for (index, value) in indexed_values(matches, spec.dest) {
            let current_tag = tags
                .iter()
                .take_while(|(tag_index, _)| *tag_index < index)
                .last()
                .map(|(_, tag_value)| tag_value.clone());
            match current_tag {
                Some(tag_value) => items.push(TaggedValue {
                    value,
                    tag: tag_value,
                }),
                None => {
                    return Err(CliError::InvalidOption(format!(
                        "--{} must be preceded by --{tag_flag}",
                        spec.flag
                    )));
                }
            }
        }
        Ok(items)
    }
}

fn indexed_values(matches: &ArgMatches, dest: &str) -> Vec<(usize, String)> {
    match (matches.indices_of(dest), matches.get_many::<String>(dest)) {
        (Some(indices), Some(values)) => indices.zip(values.cloned()).collect(),
        _ => Vec::new(),
    }
}

/// Base unit of work behind every CLI action.
///
/// Lifecycle per invocation: `configure` declares options, the host parses,
/// `check_options` declares requirements, the host validates, then `run`
/// executes. Actions hold no mutable state across invocations; everything
/// per-invocation lives in the [`ParsedOptions`].
#[async_trait]
pub(crate) trait Action: Send + Sync {
    /// One-line description shown in usage listings.
    fn description(&self) -> &'static str;

    /// Declare this action's options. Pure declaration, no I/O.
    fn configure(&self, parser: &mut ParserBuilder);

    /// Declare this action's requirement rules.
    fn check_options(&self, validator: &mut Validator);

    /// Execute the action.
    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus>;
}
