//! We can insert create table queries at the beginning of our .sql tests and these will be used
//! as the catalog of every test in the file.

use crate::engine::catalog::Catalog;
use crate::engine::tests::reader::TestLineIterator;

pub fn read_catalog(lines: &mut TestLineIterator) -> Result<Catalog, crate::Error> {
    let mut buffer = String::new();

    while let Some((_, next_item)) = lines.peek() {
        let Ok(line) = next_item else {
            break; // malformed UTF-8, the test reader reports it
        };

        if line.starts_with("-- Test: ") {
            // Any create table statements AFTER the first test are ignored.
            break;
        }

        if !line.is_empty() && !line.starts_with("--") {
            buffer.push_str(line);
            buffer.push('\n');
        }

        lines.next();
    }

    Catalog::from_ddl_str(&buffer)
}
