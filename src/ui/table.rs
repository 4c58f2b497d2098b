use crate::schema::{EntityKind, File, LanguageType, Parent};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct DeclarationRow {
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Lines")]
    pub lines: String,
    #[tabled(rename = "Returns")]
    pub returns: String,
}

#[derive(Tabled)]
pub struct LanguageRow {
    #[tabled(rename = "Language")]
    pub language: String,
    #[tabled(rename = "Tag")]
    pub tag: String,
    #[tabled(rename = "Extensions")]
    pub extensions: String,
}

/// Classes and functions of `file` in source order, indented by nesting.
pub fn declarations_table(file: &File) -> String {
    let mut entries: Vec<(usize, usize, DeclarationRow)> = Vec::new();

    for class in file.classes() {
        entries.push((
            class.location.start_line,
            0,
            DeclarationRow {
                kind: "class".to_string(),
                name: indented(file, &class.parent, &class.name),
                lines: class.location.to_string(),
                returns: String::new(),
            },
        ));
    }
    for function in file.functions() {
        let kind = if function.is_constructor {
            "constructor"
        } else {
            "function"
        };
        let name = if function.is_anonymous() {
            "<lambda>"
        } else {
            function.name.as_str()
        };
        entries.push((
            function.location.start_line,
            1,
            DeclarationRow {
                kind: kind.to_string(),
                name: indented(file, &function.parent, name),
                lines: function.location.to_string(),
                returns: function.return_type.clone().unwrap_or_else(|| "-".to_string()),
            },
        ));
    }

    if entries.is_empty() {
        return String::new();
    }
    entries.sort_by_key(|(line, order, _)| (*line, *order));
    let rows: Vec<DeclarationRow> = entries.into_iter().map(|(_, _, row)| row).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn languages_table() -> String {
    let rows: Vec<LanguageRow> = LanguageType::all()
        .iter()
        .map(|lang| LanguageRow {
            language: lang.display_name().to_string(),
            tag: lang.as_str().to_string(),
            extensions: lang.extensions().join(", "),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn indented(file: &File, parent: &Parent, name: &str) -> String {
    format!("{}{}", "  ".repeat(nesting(file, parent)), name)
}

/// Number of enclosing entities below the file
fn nesting(file: &File, parent: &Parent) -> usize {
    let mut depth = 0;
    let mut current = parent.clone();
    while current.kind != EntityKind::File {
        depth += 1;
        let next = match current.kind {
            EntityKind::Function => file.function(&current.id).map(|f| f.parent.clone()),
            EntityKind::Class => file.class(&current.id).map(|c| c.parent.clone()),
            EntityKind::File => None,
        };
        match next {
            Some(next) => current = next,
            None => break,
        }
    }
    depth
}
