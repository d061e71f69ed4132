/// `CREATE OR REPLACE VIEW` for a normalized body
pub fn create_view_statement(name: &str, body: &str) -> String {
    format!("CREATE OR REPLACE VIEW {} AS ({});", name, body)
}

pub fn drop_view_statement(name: &str) -> String {
    format!("DROP VIEW IF EXISTS {};", name)
}
