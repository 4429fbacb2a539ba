use folio_types::{Block, RunStyle};

pub const BULLET_PREFIX: &str = "• ";

/// The unit the layout engine consumes: a styled run or a centred header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutUnit {
    Run { text: String, style: RunStyle },
    Header { text: String },
}

impl LayoutUnit {
    pub fn run(text: impl Into<String>, style: RunStyle) -> Self {
        LayoutUnit::Run {
            text: text.into(),
            style,
        }
    }

    pub fn header(text: impl Into<String>) -> Self {
        LayoutUnit::Header { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            LayoutUnit::Run { text, .. } | LayoutUnit::Header { text } => text,
        }
    }
}

/// Converts one block into the ordered units it contributes to the page.
pub fn normalize(block: &Block) -> Vec<LayoutUnit> {
    match block {
        Block::Paragraph { runs } => runs
            .iter()
            .map(|run| LayoutUnit::run(run.text.clone(), run.style))
            .collect(),
        Block::Header { text } => vec![LayoutUnit::header(text.clone())],
        Block::ListBlock { items } => items
            .iter()
            .map(|item| LayoutUnit::run(format!("{BULLET_PREFIX}{item}"), RunStyle::Normal))
            .collect(),
        Block::Unknown { text } => vec![LayoutUnit::run(text.clone(), RunStyle::Normal)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::StyledRun;

    #[test]
    fn paragraph_runs_keep_order_and_style() {
        let block = Block::Paragraph {
            runs: vec![
                StyledRun::normal("a "),
                StyledRun::new("b", RunStyle::Bold),
                StyledRun::new("c", RunStyle::Bold),
            ],
        };
        assert_eq!(
            normalize(&block),
            vec![
                LayoutUnit::run("a ", RunStyle::Normal),
                LayoutUnit::run("b", RunStyle::Bold),
                LayoutUnit::run("c", RunStyle::Bold),
            ]
        );
    }

    #[test]
    fn list_items_become_bulleted_runs() {
        let block = Block::ListBlock {
            items: vec!["first".into(), "second".into()],
        };
        let units = normalize(&block);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text(), "• first");
        assert_eq!(units[1], LayoutUnit::run("• second", RunStyle::Normal));
    }

    #[test]
    fn header_and_unknown() {
        assert_eq!(
            normalize(&Block::Header { text: "Title".into() }),
            vec![LayoutUnit::header("Title")]
        );
        assert_eq!(
            normalize(&Block::Unknown { text: "quote".into() }),
            vec![LayoutUnit::run("quote", RunStyle::Normal)]
        );
    }
}
