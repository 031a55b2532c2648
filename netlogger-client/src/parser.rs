//! NetLogger XML response parser
//!
//! Net listings look like
//! `<NetLoggerXML><ServerList><Server><ServerName/><Net>...</Net></Server></ServerList></NetLoggerXML>`,
//! checkin listings like `<NetLoggerXML><CheckinList><Checkin>...</Checkin></CheckinList></NetLoggerXML>`.
//! Each `Net` / `Checkin` element holds one leaf element per column.

use netlogger_common::{normalize, CheckinRecord, NetRecord, RawFields};
use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

use crate::error::Result;

/// Everything extracted from one net-listing response
#[derive(Debug, Clone, Default)]
pub struct NetListing {
    /// Every `ServerName` text in document order, duplicates included
    pub servers: Vec<String>,
    /// Normalized nets, grouped by server in first-seen order
    pub nets: Vec<NetRecord>,
}

/// NetLogger bodies may open with a `<!DOCTYPE>`; external entities are never resolved.
fn parse_document(xml: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(xml, options)?)
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

/// Leaf descendants of `row` (the row element itself excluded) as tag → text
fn leaf_fields(row: Node<'_, '_>) -> RawFields {
    row.descendants()
        .skip(1)
        .filter(|n| n.is_element() && !n.children().any(|c| c.is_element()))
        .map(|n| {
            (
                n.tag_name().name().to_string(),
                n.text().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

/// `ServerList/Server[ServerName=server]/Net` relative to the document root
fn nets_for_server<'a, 'input>(
    root: Node<'a, 'input>,
    server: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    child_elements(root, "ServerList")
        .flat_map(|list| child_elements(list, "Server"))
        .filter(move |s| {
            child_elements(*s, "ServerName").any(|name| name.text().unwrap_or_default() == server)
        })
        .flat_map(|s| child_elements(s, "Net"))
}

/// Parse a `GetActiveNets.php` / `GetPastNets.php` body.
///
/// Returns `Ok(None)` when the document names no server at all.
pub fn parse_net_list(xml: &str) -> Result<Option<NetListing>> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();

    let servers: Vec<String> = root
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "ServerName")
        .map(|n| n.text().unwrap_or_default().to_string())
        .collect();

    if servers.is_empty() {
        return Ok(None);
    }

    let mut seen: Vec<&str> = Vec::new();
    let mut nets = Vec::new();

    for server in &servers {
        if seen.contains(&server.as_str()) {
            continue;
        }
        seen.push(server);

        for net in nets_for_server(root, server) {
            let mut fields = leaf_fields(net);
            fields.insert("Server".to_string(), server.clone());
            nets.push(normalize(fields)?);
        }
    }

    debug!("Parsed {} nets across {} servers", nets.len(), seen.len());

    Ok(Some(NetListing { servers, nets }))
}

/// Parse a `GetCheckins.php` / `GetPastNetCheckins.php` body
pub fn parse_checkin_list(xml: &str) -> Result<Vec<CheckinRecord>> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();

    let checkins: Vec<CheckinRecord> = child_elements(root, "CheckinList")
        .flat_map(|list| child_elements(list, "Checkin"))
        .map(|row| CheckinRecord::new(leaf_fields(row)))
        .collect();

    debug!("Parsed {} checkins", checkins.len());

    Ok(checkins)
}
