//! `chemicals`, `explain` and `mixtures`.

use std::fmt::Write as _;

use anyhow::Result;
use flamelab_core::{Element, FLAME_TEST_THEORY, LabSettings, chemicals};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{flag, hex_color, separator, truncate_string};

const TABLE_WIDTH: usize = 78;

/// The chemical catalog, marking which salts are on the bench.
pub fn render_chemicals(lab: &LabSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<10} {:<8} {:<8} {:>6}  {:<5}  Safety",
        "Sym", "Name", "Formula", "Flame", "nm", "Bench"
    );
    let _ = writeln!(out, "{}", separator(TABLE_WIDTH));
    for chem in chemicals::catalog() {
        let on_bench = lab.bench.iter().any(|slot| slot.element == chem.element);
        let _ = writeln!(
            out,
            "{:<4} {:<10} {:<8} {:<8} {:>6}  {:<5}  {}",
            chem.element.symbol(),
            chem.name,
            chem.formula,
            hex_color(chem.color),
            chem.wavelength_nm,
            flag(on_bench),
            truncate_string(chem.safety_warning, 30)
        );
    }
    out
}

/// Full explanation for one element followed by the general theory.
pub fn render_explanation(symbol: &str) -> Result<String, CliError> {
    let element: Element = symbol.parse()?;
    Ok(format!(
        "{}\n\n{}\n{}",
        chemicals::explanation(element),
        separator(TABLE_WIDTH),
        FLAME_TEST_THEORY
    ))
}

/// Every registered mixture with its colour and notes.
pub fn render_mixtures() -> String {
    let mut out = String::new();
    for (i, m) in chemicals::mixtures().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let (a, b) = m.pair;
        let _ = writeln!(
            out,
            "{} + {}  ({} + {})  {}",
            a,
            b,
            a.chemical().name,
            b.chemical().name,
            hex_color(m.result_color)
        );
        let _ = writeln!(out, "  {}", m.description);
        let _ = writeln!(out, "  Reaction: {}", m.explanation);
        let _ = writeln!(out, "  Note:     {}", m.realistic_note);
    }
    out
}

pub fn list(ctx: &CliContext) -> Result<()> {
    print!("{}", render_chemicals(&ctx.settings.lab));
    Ok(())
}

pub fn explain(symbol: &str) -> Result<()> {
    println!("{}", render_explanation(symbol)?);
    Ok(())
}

pub fn mixtures() -> Result<()> {
    print!("{}", render_mixtures());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barium_is_listed_but_not_on_the_bench() {
        let table = render_chemicals(&LabSettings::default());
        let barium = table.lines().find(|l| l.starts_with("Ba ")).unwrap();
        assert!(barium.contains("Barium"));
        assert!(barium.contains(" -  "));
        let sodium = table.lines().find(|l| l.starts_with("Na ")).unwrap();
        assert!(sodium.contains("yes"));
        assert!(sodium.contains("589"));
    }

    #[test]
    fn explanation_accepts_lowercase_symbols() {
        let text = render_explanation("cu").unwrap();
        assert!(text.contains("Copper"));
        assert!(text.contains(FLAME_TEST_THEORY));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let err = render_explanation("Xx").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn mixtures_list_every_pair() {
        let text = render_mixtures();
        assert_eq!(text.matches("Reaction:").count(), chemicals::mixtures().len());
        assert!(text.contains("Na + K"));
    }
}
