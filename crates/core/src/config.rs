#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Create,
    Update,
    Delete,
    Query,
}

/// Clause ordering the ORM uses when it assembles each statement kind.
///
/// Handed to the ORM once per database handle instead of being registered
/// process-wide.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallbackConfig {
    pub last_insert_id_reversed: bool,
    pub create_clauses: Vec<String>,
    pub update_clauses: Vec<String>,
    pub delete_clauses: Vec<String>,
    pub query_clauses: Vec<String>,
}

impl CallbackConfig {
    #[must_use]
    pub fn clauses(&self, kind: StatementKind) -> &[String] {
        match kind {
            StatementKind::Create => &self.create_clauses,
            StatementKind::Update => &self.update_clauses,
            StatementKind::Delete => &self.delete_clauses,
            StatementKind::Query => &self.query_clauses,
        }
    }
}
