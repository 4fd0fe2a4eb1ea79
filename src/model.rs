//! Named constraints over named variables, and the diagnosis tasks built on
//! top of them.

use crate::diagnosis::Label;
use anyhow::{Context, bail};
use giputils::hash::GHashMap;
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// `name = value`, a single decision of a configuration or a test case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: bool,
}

impl Assignment {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, value)) = s.split_once('=') else {
            return Err(format!("expected NAME=BOOL, found `{s}`"));
        };
        let value = match value.trim() {
            "true" | "1" => true,
            "false" | "0" => false,
            v => return Err(format!("`{v}` is not a boolean")),
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing variable name in `{s}`"));
        }
        Ok(Self::new(name, value))
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub description: String,
    pub clauses: Vec<Vec<i32>>,
}

/// What to diagnose.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DiagnosisTask {
    /// the first constraint is trusted, all others are suspects
    #[default]
    Model,
    /// as [`DiagnosisTask::Model`], with the assignments added to the background
    TestCase(Vec<Assignment>),
    /// the whole model is trusted, the assignments are suspects
    Configuration(Vec<Assignment>),
}

#[derive(Clone, Debug, Default)]
pub struct DiagnosisModel {
    names: GHashMap<i32, String>,
    variables: GHashMap<String, i32>,
    constraints: Vec<Constraint>,
    num_var: usize,
}

impl DiagnosisModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names variable `var`. Renaming a variable forgets its old name.
    pub fn add_variable(&mut self, name: impl Into<String>, var: i32) {
        assert!(var > 0, "variable ids are positive");
        let name = name.into();
        if let Some(old) = self.names.insert(var, name.clone()) {
            self.variables.remove(&old);
        }
        self.variables.insert(name, var);
        self.num_var = self.num_var.max(var as usize);
    }

    pub fn add_constraint(&mut self, description: impl Into<String>, clauses: Vec<Vec<i32>>) {
        for l in clauses.iter().flatten() {
            self.num_var = self.num_var.max(l.unsigned_abs() as usize);
        }
        self.constraints.push(Constraint {
            description: description.into(),
            clauses,
        });
    }

    /// Makes sure ids up to `num_var` are treated as model variables.
    pub fn reserve_var(&mut self, num_var: usize) {
        self.num_var = self.num_var.max(num_var);
    }

    #[inline]
    pub fn variable(&self, name: &str) -> Option<i32> {
        self.variables.get(name).copied()
    }

    #[inline]
    pub fn name(&self, var: i32) -> Option<&str> {
        self.names.get(&var.abs()).map(String::as_str)
    }

    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[inline]
    pub fn num_var(&self) -> usize {
        self.num_var
    }

    /// Renders a literal with the name of its variable, `!` marks negation.
    pub fn lit_name(&self, lit: i32) -> String {
        let neg = if lit < 0 { "!" } else { "" };
        match self.name(lit) {
            Some(name) => format!("{neg}{name}"),
            None => format!("{neg}{}", lit.unsigned_abs()),
        }
    }

    /// Guards every constraint and assignment with its own assumption id and
    /// splits the ids into candidates and background according to `task`.
    pub fn prepare(&self, task: &DiagnosisTask) -> anyhow::Result<PreparedTask> {
        let next_id = i32::try_from(self.num_var)
            .ok()
            .and_then(|n| n.checked_add(1))
            .with_context(|| format!("{} variables leave no assumption ids", self.num_var))?;
        let mut prepared = PreparedTask {
            next_id: Some(next_id),
            ..Default::default()
        };
        let constraints = self
            .constraints
            .iter()
            .map(|cst| prepared.guard(&cst.description, &cst.clauses))
            .collect::<anyhow::Result<Vec<i32>>>()?;
        match task {
            DiagnosisTask::Model | DiagnosisTask::TestCase(_) => {
                let Some((&root, rest)) = constraints.split_first() else {
                    bail!("the model has no constraints");
                };
                prepared.b.push(root);
                prepared.c.extend_from_slice(rest);
                if let DiagnosisTask::TestCase(test_case) = task {
                    for a in test_case {
                        let id = self.guard_assignment(&mut prepared, a)?;
                        prepared.b.push(id);
                    }
                }
            }
            DiagnosisTask::Configuration(configuration) => {
                prepared.b = constraints;
                for a in configuration {
                    let id = self.guard_assignment(&mut prepared, a)?;
                    prepared.c.push(id);
                }
            }
        }
        Ok(prepared)
    }

    fn guard_assignment(&self, prepared: &mut PreparedTask, a: &Assignment) -> anyhow::Result<i32> {
        let var = self
            .variable(&a.name)
            .with_context(|| format!("variable `{}` is not in the model", a.name))?;
        let lit = if a.value { var } else { -var };
        prepared.guard(&a.to_string(), &[vec![lit]])
    }
}

/// A diagnosis task ready for the search: the guarded knowledge base, the
/// candidate and background assumption ids, and what each id stands for.
#[derive(Clone, Debug, Default)]
pub struct PreparedTask {
    pub kb: Vec<Vec<i32>>,
    pub c: Vec<i32>,
    pub b: Vec<i32>,
    descriptions: GHashMap<i32, String>,
    next_id: Option<i32>,
}

impl PreparedTask {
    fn guard(&mut self, description: &str, clauses: &[Vec<i32>]) -> anyhow::Result<i32> {
        let Some(id) = self.next_id else {
            bail!("no assumption id left for `{description}`");
        };
        self.next_id = id.checked_add(1);
        for cls in clauses {
            let mut cls = cls.clone();
            cls.push(-id);
            self.kb.push(cls);
        }
        self.descriptions.insert(id, description.to_string());
        Ok(id)
    }

    #[inline]
    pub fn description(&self, id: i32) -> Option<&str> {
        self.descriptions.get(&id).map(String::as_str)
    }

    /// `[d1, d2],[d3]` for the labels `[[id1, id2], [id3]]`.
    pub fn pretty(&self, labels: &[Label]) -> String {
        labels
            .iter()
            .map(|label| {
                let descs: Vec<&str> = label
                    .iter()
                    .filter_map(|&id| self.description(id))
                    .filter(|d| !d.is_empty())
                    .collect();
                format!("[{}]", descs.join(", "))
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> DiagnosisModel {
        let mut model = DiagnosisModel::new();
        model.add_variable("p", 1);
        model.add_variable("q", 2);
        model.add_constraint("p", vec![vec![1]]);
        model.add_constraint("p -> q", vec![vec![-1, 2]]);
        model.add_constraint("p -> !q", vec![vec![-1, -2]]);
        model
    }

    #[test]
    fn model_task() {
        let task = model().prepare(&DiagnosisTask::Model).unwrap();
        assert_eq!(task.kb, vec![vec![1, -3], vec![-1, 2, -4], vec![-1, -2, -5]]);
        assert_eq!(task.b, vec![3]);
        assert_eq!(task.c, vec![4, 5]);
        assert_eq!(task.description(4), Some("p -> q"));
        assert_eq!(task.pretty(&[vec![4, 5], vec![3]]), "[p -> q, p -> !q],[p]");
        assert_eq!(task.pretty(&[]), "");
    }

    #[test]
    fn test_case_task() {
        let task = model()
            .prepare(&DiagnosisTask::TestCase(vec![Assignment::new("q", false)]))
            .unwrap();
        assert_eq!(task.b, vec![3, 6]);
        assert_eq!(task.c, vec![4, 5]);
        assert_eq!(task.kb.last(), Some(&vec![-2, -6]));
        assert_eq!(task.description(6), Some("q = false"));
    }

    #[test]
    fn configuration_task() {
        let mut model = model();
        model.add_variable("r", 7);
        let task = model
            .prepare(&DiagnosisTask::Configuration(vec![
                Assignment::new("p", true),
                Assignment::new("r", true),
            ]))
            .unwrap();
        assert_eq!(task.b, vec![8, 9, 10]);
        assert_eq!(task.c, vec![11, 12]);
        assert_eq!(task.kb[3], vec![1, -11]);
        assert_eq!(task.kb[4], vec![7, -12]);
        assert_eq!(task.pretty(&[vec![12]]), "[r = true]");
    }

    #[test]
    fn unknown_variable_is_an_error() {
        let err = model()
            .prepare(&DiagnosisTask::Configuration(vec![Assignment::new("x", true)]))
            .unwrap_err();
        assert!(err.to_string().contains("`x` is not in the model"));
        assert!(DiagnosisModel::new().prepare(&DiagnosisTask::Model).is_err());
    }

    #[test]
    fn assumption_ids_stay_in_literal_range() {
        let mut model = model();
        model.reserve_var(i32::MAX as usize - 2);
        let err = model.prepare(&DiagnosisTask::Model).unwrap_err();
        assert!(err.to_string().contains("no assumption id left for `p -> !q`"));

        let mut model = DiagnosisModel::new();
        model.reserve_var(u32::MAX as usize + 1);
        model.add_constraint("p", vec![vec![1]]);
        model.add_constraint("not p", vec![vec![-1]]);
        let err = model.prepare(&DiagnosisTask::Model).unwrap_err();
        assert!(err.to_string().contains("leave no assumption ids"));
    }

    #[test]
    fn parse_assignment() {
        assert_eq!("a=true".parse(), Ok(Assignment::new("a", true)));
        assert_eq!(" b = 0".parse(), Ok(Assignment::new("b", false)));
        assert!("c".parse::<Assignment>().is_err());
        assert!("c=yes".parse::<Assignment>().is_err());
        assert!("=1".parse::<Assignment>().is_err());
    }

    #[test]
    fn literal_names() {
        let model = model();
        assert_eq!(model.lit_name(-2), "!q");
        assert_eq!(model.lit_name(9), "9");
        assert_eq!(model.variable("p"), Some(1));
        assert_eq!(model.num_var(), 2);
    }
}
