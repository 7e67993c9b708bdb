//! Row/column access to table content for custom table renderers.
//!
//! Default table rendering does not use this; it simply nests the
//! table/thead/tbody/tr/td renderers.

use crate::ast::{ElementType, Node};
use thiserror::Error;

/// The child nodes of one cell.
pub type TableCell<'a> = &'a [Node];

/// One row of cells.
pub type TableRow<'a> = Vec<TableCell<'a>>;

/// A table split into its first row and the remaining rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableInformation<'a> {
    pub header: Option<TableRow<'a>>,
    pub body: Vec<TableRow<'a>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// A child of `table_head` / `table_body` was an element but not a row.
    #[error("Cannot find table row: {0}")]
    NotARow(ElementType),
}

/// Extract header and body rows from the contents of a `table` element.
///
/// Walks `table_head` and `table_body` children in order, keeps their element
/// children (each must be a `table_row`), and collects each row's
/// `table_cell` / `table_header_cell` children. The first row found becomes
/// the header.
pub fn build_table_information(contents: &[Node]) -> Result<TableInformation<'_>, TableError> {
    let mut rows: Vec<TableRow<'_>> = Vec::new();

    let sections = contents
        .iter()
        .filter_map(Node::as_element)
        .filter(|el| matches!(el.element_type, ElementType::TableHead | ElementType::TableBody));

    for section in sections {
        for row in section.children.iter().filter_map(Node::as_element) {
            rows.push(table_row(row)?);
        }
    }

    let mut rows = rows.into_iter();
    let header = rows.next();
    Ok(TableInformation {
        header,
        body: rows.collect(),
    })
}

fn table_row(node: &crate::ast::ElementNode) -> Result<TableRow<'_>, TableError> {
    if node.element_type != ElementType::TableRow {
        return Err(TableError::NotARow(node.element_type));
    }
    Ok(node
        .children
        .iter()
        .filter_map(Node::as_element)
        .filter(|el| {
            matches!(
                el.element_type,
                ElementType::TableCell | ElementType::TableHeaderCell
            )
        })
        .map(|el| el.children.as_slice())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ElementNode;

    fn cell(text: &str) -> ElementNode {
        ElementNode::new(ElementType::TableCell).with_child(
            ElementNode::new(ElementType::Paragraph).with_child(Node::text(text)),
        )
    }

    fn row(cells: &[&str]) -> ElementNode {
        ElementNode::new(ElementType::TableRow)
            .with_children(cells.iter().map(|c| Node::Element(cell(c))).collect())
    }

    #[test]
    fn splits_header_and_body() {
        let contents = vec![
            Node::Element(ElementNode::new(ElementType::TableHead).with_child(row(&["H1", "H2"]))),
            Node::Element(
                ElementNode::new(ElementType::TableBody)
                    .with_child(row(&["a", "b"]))
                    .with_child(row(&["c", "d"])),
            ),
        ];

        let info = build_table_information(&contents).unwrap();
        let header = info.header.expect("header row");
        assert_eq!(header.len(), 2);
        assert_eq!(info.body.len(), 2);

        let first_cell = &info.body[0][0];
        let para = first_cell[0].as_element().unwrap();
        assert_eq!(para.children, vec![Node::text("a")]);
    }

    #[test]
    fn ignores_non_section_top_level_nodes_and_text_in_sections() {
        let contents = vec![
            Node::text("caption"),
            Node::Element(
                ElementNode::new(ElementType::TableBody)
                    .with_child(Node::text(" "))
                    .with_child(row(&["only"])),
            ),
        ];
        let info = build_table_information(&contents).unwrap();
        assert!(info.header.is_some());
        assert!(info.body.is_empty());
    }

    #[test]
    fn non_row_in_section_is_an_error() {
        let contents = vec![Node::Element(
            ElementNode::new(ElementType::TableBody).with_child(cell("stray")),
        )];
        let err = build_table_information(&contents).unwrap_err();
        assert_eq!(err, TableError::NotARow(ElementType::TableCell));
        assert_eq!(err.to_string(), "Cannot find table row: table_cell");
    }
}
