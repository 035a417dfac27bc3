use std::fmt::{self, Display, Formatter};

/// Identifies which key family an encoded key belongs to, attached to
/// decode/encode errors so a caller can tell what it was trying to read
/// without re-deriving it from the raw bytes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum Category {
	Namespace,
	NamespaceRoot,
	NamespaceToken,
	NamespaceUser,
	Database,
	DatabaseRoot,
	DatabaseToken,
	DatabaseUser,
	Scope,
	ScopeRoot,
	ScopeToken,
	Table,
	TableRoot,
	TableField,
	TableEvent,
	TableView,
	IndexDefinition,
	TableLiveQuery,
	IndexRoot,
	Index,
	Thing,
	Patch,
}

pub(crate) trait Categorise {
	fn categorise(&self) -> Category;
}

impl Display for Category {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let name = match self {
			Category::Namespace => "Namespace",
			Category::NamespaceRoot => "NamespaceRoot",
			Category::NamespaceToken => "NamespaceToken",
			Category::NamespaceUser => "NamespaceUser",
			Category::Database => "Database",
			Category::DatabaseRoot => "DatabaseRoot",
			Category::DatabaseToken => "DatabaseToken",
			Category::DatabaseUser => "DatabaseUser",
			Category::Scope => "Scope",
			Category::ScopeRoot => "ScopeRoot",
			Category::ScopeToken => "ScopeToken",
			Category::Table => "Table",
			Category::TableRoot => "TableRoot",
			Category::TableField => "TableField",
			Category::TableEvent => "TableEvent",
			Category::TableView => "TableView",
			Category::IndexDefinition => "IndexDefinition",
			Category::TableLiveQuery => "TableLiveQuery",
			Category::IndexRoot => "IndexRoot",
			Category::Index => "Index",
			Category::Thing => "Thing",
			Category::Patch => "Patch",
		};
		write!(f, "{name}")
	}
}
