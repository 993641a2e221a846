use crate::classifier::SectionState;
use crate::models::Sequenced;

/// Fold raw lines through a classifier step, keeping the rows it accepts
/// in source order and numbering them from 1.
///
/// Hierarchy is carried only by each row's level and section; the output
/// is never regrouped.
pub fn sequence<L, R, F>(lines: impl IntoIterator<Item = L>, mut step: F) -> Vec<Sequenced<R>>
where
    F: FnMut(SectionState, L) -> (SectionState, Option<R>),
{
    let (_, rows) = lines.into_iter().fold(
        (SectionState::default(), Vec::new()),
        |(state, mut rows), line| {
            let (next, row) = step(state, line);
            if let Some(row) = row {
                let row_order = rows.len() as u32 + 1;
                rows.push(Sequenced { row_order, row });
            }
            (next, rows)
        },
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify_account, AccountLine, AccountVocabulary};
    use crate::models::Level;

    const VOCAB: AccountVocabulary = AccountVocabulary {
        header_label: "Account Name",
        code_header: None,
        skip_labels: &[],
        sections: &["ASSETS", "LIABILITIES"],
        category_prefix: Some("Plus "),
        named_levels: &[],
        fallback: Level::Category,
        require_name: false,
    };

    fn line(code: Option<&str>, name: Option<&str>) -> AccountLine {
        AccountLine {
            code: code.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_row_order_counts_survivors_only() {
        let lines = vec![
            line(None, Some("Account Name")),
            line(None, Some("ASSETS")),
            line(None, None),
            line(Some("100"), Some("Cash")),
            line(None, None),
            line(Some("110"), Some("Bank")),
        ];
        let rows = sequence(lines, |s, l| classify_account(&l, s, &VOCAB));
        let orders: Vec<u32> = rows.iter().map(|r| r.row_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(rows[1].row.name, "Cash");
        assert_eq!(rows[2].row.name, "Bank");
    }

    #[test]
    fn test_parent_section_follows_latest_section() {
        let lines = vec![
            line(None, Some("ASSETS")),
            line(Some("100"), Some("Cash")),
            line(None, Some("Plus Fixed Assets")),
            line(None, Some("LIABILITIES")),
            line(Some("200"), Some("Payables")),
            line(None, Some("Loans")),
        ];
        let rows = sequence(lines, |s, l| classify_account(&l, s, &VOCAB));
        let sections: Vec<_> = rows.iter().map(|r| r.row.parent_section.as_deref()).collect();
        assert_eq!(
            sections,
            vec![
                Some("ASSETS"),
                Some("ASSETS"),
                Some("ASSETS"),
                Some("LIABILITIES"),
                Some("LIABILITIES"),
                Some("LIABILITIES"),
            ]
        );
    }

    #[test]
    fn test_rows_before_any_section_have_no_parent() {
        let rows = sequence(vec![line(Some("1"), Some("Orphan"))], |s, l| {
            classify_account(&l, s, &VOCAB)
        });
        assert_eq!(rows[0].row.parent_section, None);
    }

    #[test]
    fn test_empty_input() {
        let rows = sequence(Vec::<AccountLine>::new(), |s, l| classify_account(&l, s, &VOCAB));
        assert!(rows.is_empty());
    }
}
