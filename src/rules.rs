use crate::model::ShiftCode;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Table livrée avec l'application : `(garde précédente, garde suivante, repos minimal)`.
/// Une durée de `0` interdit l'enchaînement quel que soit le repos.
const STANDARD_RULES: &[(ShiftCode, ShiftCode, u8)] = &[
    (ShiftCode::N, ShiftCode::A, 11),
    (ShiftCode::N, ShiftCode::B, 11),
    (ShiftCode::N, ShiftCode::C, 11),
    (ShiftCode::N, ShiftCode::K, 11),
    (ShiftCode::N, ShiftCode::D, 0),
    (ShiftCode::N, ShiftCode::E, 0),
    (ShiftCode::N, ShiftCode::F, 0),
    (ShiftCode::E, ShiftCode::A, 11),
    (ShiftCode::E, ShiftCode::K, 11),
    (ShiftCode::D, ShiftCode::A, 8),
    (ShiftCode::F, ShiftCode::A, 8),
];

/// Une règle d'enchaînement telle que sérialisée en JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestRule {
    pub before: ShiftCode,
    pub after: ShiftCode,
    pub min_rest_hours: u8,
}

/// Contrainte portée par une paire de gardes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Forbidden,
    MinRest(u8),
}

/// Table des enchaînements contraints. Les paires absentes sont libres.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: BTreeMap<(ShiftCode, ShiftCode), u8>,
}

impl RuleTable {
    /// Table standard, construite une seule fois.
    pub fn standard() -> &'static RuleTable {
        static STANDARD: OnceLock<RuleTable> = OnceLock::new();
        STANDARD.get_or_init(|| RuleTable {
            rules: STANDARD_RULES
                .iter()
                .map(|&(before, after, hours)| ((before, after), hours))
                .collect(),
        })
    }

    /// Construit une table personnalisée en la validant.
    pub fn from_rules<I>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = RestRule>,
    {
        let mut table = RuleTable::default();
        for rule in rules {
            validate_rule(&rule)?;
            if table
                .rules
                .insert((rule.before, rule.after), rule.min_rest_hours)
                .is_some()
            {
                bail!("duplicate rule for {} -> {}", rule.before, rule.after);
            }
        }
        Ok(table)
    }

    pub fn constraint(&self, before: ShiftCode, after: ShiftCode) -> Option<Constraint> {
        self.rules.get(&(before, after)).map(|&hours| match hours {
            0 => Constraint::Forbidden,
            h => Constraint::MinRest(h),
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = RestRule> + '_ {
        self.rules.iter().map(|(&(before, after), &min_rest_hours)| RestRule {
            before,
            after,
            min_rest_hours,
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn validate_rule(rule: &RestRule) -> Result<()> {
    for code in [rule.before, rule.after] {
        if code.is_leave() {
            bail!("leave code {code} cannot appear in a rest rule");
        }
        if code.is_rest() {
            bail!("rest day {code} cannot appear in a rest rule");
        }
    }
    Ok(())
}

pub fn load_rule_table_from_file<P: AsRef<Path>>(path: P) -> Result<RuleTable> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading rule table {}", path.display()))?;
    let rules: Vec<RestRule> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing rule table {}", path.display()))?;
    RuleTable::from_rules(rules)
}

pub fn export_rule_table_json<P: AsRef<Path>>(path: P, table: &RuleTable) -> Result<()> {
    let rules: Vec<RestRule> = table.rules().collect();
    let json = serde_json::to_string_pretty(&rules)?;
    fs::write(path, json)?;
    Ok(())
}
