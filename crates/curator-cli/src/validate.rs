//! Required-option validation.
//!
//! Rules are declared by an action after parsing and checked in one pass;
//! a failure reports every missing flag at once so the user never has to
//! fix-one-and-rerun.

use crate::action::ParsedOptions;
use crate::client::{CliError, CliResult};

/// One requirement: a destination key plus the flag spelling to report.
/// A rule with several members is an alternation group that is satisfied
/// by any one of them.
#[derive(Debug, Clone)]
pub(crate) struct RequirementRule {
    members: Vec<RuleMember>,
}

#[derive(Debug, Clone)]
struct RuleMember {
    dest: &'static str,
    flag: String,
}

impl RequirementRule {
    fn satisfied(&self, options: &ParsedOptions) -> bool {
        self.members.iter().any(|member| options.is_set(member.dest))
    }

    fn describe(&self) -> String {
        self.members
            .iter()
            .map(|member| member.flag.clone())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// Collects requirement rules for one invocation and checks them all.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    rules: Vec<RequirementRule>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Require an option whose flag spelling matches its destination key.
    pub(crate) fn require(&mut self, dest: &'static str) {
        let flag = format!("--{dest}");
        self.push_single(dest, flag);
    }

    /// Require an option, reporting `flag` when it is missing. Used when
    /// the flag spelling differs from the destination key.
    pub(crate) fn require_as(&mut self, dest: &'static str, flag: &str) {
        self.push_single(dest, flag.to_string());
    }

    fn push_single(&mut self, dest: &'static str, flag: String) {
        self.rules.push(RequirementRule {
            members: vec![RuleMember { dest, flag }],
        });
    }

    /// Require at least one of several options, reported as a single
    /// `--a or --b` clause when all are missing.
    pub(crate) fn require_any(&mut self, members: &[(&'static str, &str)]) {
        self.rules.push(RequirementRule {
            members: members
                .iter()
                .map(|(dest, flag)| RuleMember {
                    dest,
                    flag: (*flag).to_string(),
                })
                .collect(),
        });
    }

    /// Check every rule, reporting the complete list of missing flags.
    pub(crate) fn validate(&self, options: &ParsedOptions) -> CliResult<()> {
        let flags: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| !rule.satisfied(options))
            .map(RequirementRule::describe)
            .collect();
        if flags.is_empty() {
            Ok(())
        } else {
            Err(CliError::MissingOptions { flags })
        }
    }
}
