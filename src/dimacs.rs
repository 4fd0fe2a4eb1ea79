//! DIMACS CNF with named variables and named groups of clauses.
//!
//! ```text
//! p cnf 2 3
//! c 1 p
//! c 2 q
//! c constraint root
//! 1 0
//! c constraint p implies q
//! -1 2 0
//! -1 -2 0
//! ```
//!
//! `c <var> <name>` names a variable and `c constraint <description>` opens a
//! group that takes every following clause up to the next group. Clauses in
//! front of the first group become one constraint each. Other comments are
//! ignored, and so is everything after a line starting with `%`.

use crate::model::DiagnosisModel;
use anyhow::{Context, bail};
use logicrs::{Lit, LitVec};
use std::{fmt::Write, fs, path::Path};

/// Converts a DIMACS literal. `0` and `i32::MIN` are not literals.
#[inline]
pub fn lit(l: i32) -> Option<Lit> {
    (l != 0 && l != i32::MIN).then(|| Lit::from(l))
}

pub fn clause(cls: &[i32]) -> Option<LitVec> {
    cls.iter().map(|&l| lit(l)).collect()
}

pub fn read_model(path: impl AsRef<Path>) -> anyhow::Result<DiagnosisModel> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read model {}", path.display()))?;
    parse_model(&text).with_context(|| format!("failed to parse model {}", path.display()))
}

pub fn parse_model(text: &str) -> anyhow::Result<DiagnosisModel> {
    let mut model = DiagnosisModel::new();
    let mut groups: Vec<(Option<String>, Vec<Vec<i32>>)> = Vec::new();
    let mut clause = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        let lno = i + 1;
        if line.starts_with('%') {
            break;
        }
        if let Some(comment) = line.strip_prefix('c') {
            if !comment.is_empty() && !comment.starts_with(char::is_whitespace) {
                bail!("line {lno}: unexpected `{line}`");
            }
            let comment = comment.trim();
            if let Some(desc) = comment.strip_prefix("constraint") {
                if desc.is_empty() || desc.starts_with(char::is_whitespace) {
                    groups.push((Some(desc.trim().to_string()), Vec::new()));
                    continue;
                }
            }
            let mut tokens = comment.split_whitespace();
            if let (Some(var), Some(name)) = (tokens.next(), tokens.next()) {
                if let Ok(var) = var.parse::<i32>() {
                    if var <= 0 {
                        bail!("line {lno}: invalid variable id {var}");
                    }
                    model.add_variable(name, var);
                }
            }
            continue;
        }
        if let Some(header) = line.strip_prefix('p') {
            let tokens: Vec<&str> = header.split_whitespace().collect();
            let num_var = match tokens.as_slice() {
                ["cnf", v, c] if c.parse::<usize>().is_ok() => v.parse::<usize>().ok(),
                _ => None,
            };
            let Some(num_var) = num_var else {
                bail!("line {lno}: malformed header `{line}`");
            };
            if num_var > i32::MAX as usize {
                bail!("line {lno}: {num_var} variables exceed the literal range");
            }
            model.reserve_var(num_var);
            continue;
        }
        for token in line.split_whitespace() {
            let Ok(l) = token.parse::<i32>() else {
                bail!("line {lno}: `{token}` is not a literal");
            };
            if l == 0 {
                let cls = std::mem::take(&mut clause);
                match groups.last_mut() {
                    Some((Some(_), clauses)) => clauses.push(cls),
                    _ => groups.push((None, vec![cls])),
                }
            } else if l == i32::MIN {
                bail!("line {lno}: literal {l} out of range");
            } else {
                clause.push(l);
            }
        }
    }
    if !clause.is_empty() {
        bail!("unterminated clause {clause:?} at the end of the model");
    }
    for (desc, clauses) in groups {
        let desc = desc.unwrap_or_else(|| {
            clauses[0]
                .iter()
                .map(|&l| model.lit_name(l))
                .collect::<Vec<_>>()
                .join(" | ")
        });
        model.add_constraint(desc, clauses);
    }
    Ok(model)
}

/// Writes `model` back in the format [`parse_model`] reads.
pub fn write_model(model: &DiagnosisModel) -> String {
    let mut res = String::new();
    let num_clause: usize = model.constraints().iter().map(|c| c.clauses.len()).sum();
    let _ = writeln!(res, "p cnf {} {num_clause}", model.num_var());
    for v in 1..=model.num_var() as i32 {
        if let Some(name) = model.name(v) {
            let _ = writeln!(res, "c {v} {name}");
        }
    }
    for cst in model.constraints() {
        let _ = writeln!(res, "c constraint {}", cst.description);
        for cls in cst.clauses.iter() {
            for l in cls {
                let _ = write!(res, "{l} ");
            }
            res.push_str("0\n");
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_and_names() {
        let model = parse_model(
            "c a comment\np cnf 3 4\nc 1 p\nc 2 q\n-1 -3 0\nc constraint q needs p\n\
             -2 1 0\n2 0\n%\n0\n",
        )
        .unwrap();
        assert_eq!(model.num_var(), 3);
        assert_eq!(model.variable("q"), Some(2));
        let csts = model.constraints();
        assert_eq!(csts.len(), 2);
        assert_eq!(csts[0].description, "!p | !3");
        assert_eq!(csts[0].clauses, vec![vec![-1, -3]]);
        assert_eq!(csts[1].description, "q needs p");
        assert_eq!(csts[1].clauses, vec![vec![-2, 1], vec![2]]);
    }

    #[test]
    fn clauses_may_span_lines() {
        let model = parse_model("1 2\n3 0 -1 0\n").unwrap();
        let clauses: Vec<_> = model.constraints().iter().map(|c| c.clauses.clone()).collect();
        assert_eq!(clauses, vec![vec![vec![1, 2, 3]], vec![vec![-1]]]);
        assert_eq!(model.constraints()[0].description, "1 | 2 | 3");
    }

    #[test]
    fn parse_errors_name_the_line() {
        let err = parse_model("p cnf 2 1\n1 x 0\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: `x` is not a literal");
        let err = parse_model("p cnf two 1\n").unwrap_err();
        assert!(err.to_string().starts_with("line 1: malformed header"));
        assert!(parse_model("1 2\n").is_err());
        assert!(parse_model("c -4 neg\n").is_err());
        assert!(parse_model("cnf\n").is_err());
    }

    #[test]
    fn header_beyond_literal_range() {
        let err = parse_model("p cnf 4294967296 2\n1 0\n-1 0\n").unwrap_err();
        assert!(err.to_string().contains("exceed the literal range"));
        let model = parse_model("p cnf 2147483647 1\n1 0\n").unwrap();
        assert_eq!(model.num_var(), i32::MAX as usize);
    }

    #[test]
    fn literal_conversion() {
        assert_eq!(lit(-7), Some(!Lit::from(7)));
        assert_eq!(lit(0), None);
        assert_eq!(lit(i32::MIN), None);
        assert_eq!(clause(&[1, -2]), Some(LitVec::from([Lit::from(1), Lit::from(-2)])));
        assert_eq!(clause(&[1, 0]), None);
    }

    #[test]
    fn written_model_reads_back() {
        let text = "c 1 p\nc 2 q\nc constraint root\n1 0\nc constraint p -> q\n-1 2 0\n";
        let model = parse_model(text).unwrap();
        let written = write_model(&model);
        assert!(written.starts_with("p cnf 2 2\nc 1 p\nc 2 q\n"));
        let again = parse_model(&written).unwrap();
        assert_eq!(again.constraints(), model.constraints());
    }
}
