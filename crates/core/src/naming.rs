use xxhash_rust::xxh3::xxh3_64;

const MAX_IDENTIFIER_LEN: usize = 64;
const TRUNCATED_NAME_LEN: usize = 56;

/// How the ORM names the objects it derives from a model.
pub trait NamingStrategy: Send + Sync {
    fn index_name(&self, table: &str, columns: &[String]) -> String;
}

/// `idx_<table>_<col1>_<col2>`; names over 64 bytes keep a 56-byte prefix
/// followed by eight hex digits of a hash of the full name.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNamingStrategy;

impl NamingStrategy for DefaultNamingStrategy {
    fn index_name(&self, table: &str, columns: &[String]) -> String {
        let name = format!("idx_{table}_{}", columns.join("_")).replace('.', "_");
        if name.len() <= MAX_IDENTIFIER_LEN {
            return name;
        }

        let mut prefix_len = TRUNCATED_NAME_LEN;
        while !name.is_char_boundary(prefix_len) {
            prefix_len -= 1;
        }
        let digest = (xxh3_64(name.as_bytes()) >> 32) as u32;
        format!("{}{digest:08x}", &name[..prefix_len])
    }
}
