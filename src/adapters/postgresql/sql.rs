//! SQL text used against the metadata store

/// Active report definitions visible to an organization, with their
/// customization queries
///
/// `$1` is the client id, `$2` the organization id.
pub const CATALOG_QUERY: &str = r#"
SELECT q.name,
       q.query,
       q.isetendobase::text AS isetendobase,
       qc.query AS cust_query
FROM etpbic_query q
LEFT JOIN etpbic_query_custom qc ON q.etpbic_query_id = qc.etpbic_query_id
WHERE q.isactive = 'Y'
  AND q.ad_client_id = $1
  AND (ad_isorgincluded(q.ad_org_id, $2, $1) <> -1 OR q.ad_org_id = '0')
"#;

/// Switches the session to read-only transactions
pub const READ_ONLY_SESSION: &str = "SET SESSION CHARACTERISTICS AS TRANSACTION READ ONLY";

/// Quote a value as a SQL string literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Wrap a base query so only rows of `client_id`, and of organizations
/// included under `org_id` (or global ones), come back
pub fn scoped_query(base_query: &str, client_id: &str, org_id: &str) -> String {
    let client = quote_literal(client_id);
    let org = quote_literal(org_id);
    format!(
        "SELECT * FROM ({base_query}) AS q WHERE q.clientid = {client} \
         AND (ad_isorgincluded(q.orgid, {org}, {client}) <> -1 OR q.orgid = '0')"
    )
}
