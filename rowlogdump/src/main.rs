mod opts;

use anyhow::{bail, Context, Result};
use bytes::{Buf, Bytes};
use opts::Opts;
use regex::Regex;
use rowlog_core::binlog::{Event, EVENT_HEADER_LEN};
use rowlog_core::EventDecoder;
use std::collections::HashSet;
use std::fs;
use std::io;
use structopt::StructOpt;

const BINLOG_MAGIC: &[u8] = b"\xfebin";

fn main() -> Result<()> {
    env_logger::init();
    let opts = Opts::from_args();
    run(&opts)
}

fn run(opts: &Opts) -> Result<()> {
    let database_filter = compile(&opts.database)?;
    let table_filter = compile(&opts.table)?;

    let data = fs::read(&opts.file).with_context(|| format!("read {}", opts.file.display()))?;
    if !data.starts_with(BINLOG_MAGIC) {
        bail!("{} is not a binlog file", opts.file.display());
    }
    let mut input = Bytes::from(data);
    input.advance(BINLOG_MAGIC.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut decoder = EventDecoder::new();
    let mut matched_tables = HashSet::new();
    let mut printed = 0usize;

    while input.has_remaining() {
        let payload = split_event(&mut input)?;
        let event = match decoder.decode(payload) {
            Ok(event) => event,
            Err(error) => {
                log::warn!("skipping undecodable event: {}", error);
                continue;
            }
        };
        if !selected(&event, &database_filter, &table_filter, &mut matched_tables) {
            continue;
        }
        event.print(&mut out)?;
        printed += 1;
        if opts.limit.map_or(false, |limit| printed >= limit) {
            break;
        }
    }
    Ok(())
}

fn compile(pattern: &Option<String>) -> Result<Option<Regex>> {
    match pattern {
        Some(p) => Ok(Some(
            Regex::new(p).with_context(|| format!("invalid filter: {}", p))?,
        )),
        None => Ok(None),
    }
}

/// events in a binlog file are framed by the event_size field sitting at
/// offset 9 of each header
fn split_event(input: &mut Bytes) -> Result<Bytes> {
    if input.len() < EVENT_HEADER_LEN {
        bail!("{} trailing bytes after the last complete event", input.len());
    }
    let event_size =
        u32::from_le_bytes([input[9], input[10], input[11], input[12]]) as usize;
    if event_size < EVENT_HEADER_LEN || event_size > input.len() {
        bail!("invalid event size {}", event_size);
    }
    Ok(input.split_to(event_size))
}

/// with filters active only table maps and their row events are shown;
/// row events match through the table id of the last matching table map
fn selected(
    event: &Event,
    database: &Option<Regex>,
    table: &Option<Regex>,
    matched: &mut HashSet<u64>,
) -> bool {
    if database.is_none() && table.is_none() {
        return true;
    }
    match event {
        Event::TableMap(e) => {
            let hit = database
                .as_ref()
                .map_or(true, |re| re.is_match(&e.data.database))
                && table
                    .as_ref()
                    .map_or(true, |re| re.is_match(&e.data.table_name));
            if hit {
                matched.insert(e.data.table_id);
            } else {
                matched.remove(&e.data.table_id);
            }
            hit
        }
        Event::WriteRows(e) | Event::UpdateRows(e) | Event::DeleteRows(e) => {
            matched.contains(&e.data.table_id)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xid_payload(transaction_id: u64) -> Vec<u8> {
        let body = transaction_id.to_le_bytes();
        let event_size = (EVENT_HEADER_LEN + body.len()) as u32;
        let mut raw = Vec::new();
        raw.extend_from_slice(&0u32.to_le_bytes());
        raw.push(16);
        raw.extend_from_slice(&1u32.to_le_bytes());
        raw.extend_from_slice(&event_size.to_le_bytes());
        raw.extend_from_slice(&event_size.to_le_bytes());
        raw.extend_from_slice(&0u16.to_le_bytes());
        raw.extend_from_slice(&body);
        raw
    }

    #[test]
    fn test_split_event_framing() {
        let mut file = Vec::new();
        file.extend_from_slice(&xid_payload(1));
        file.extend_from_slice(&xid_payload(2));
        let mut input = Bytes::from(file);

        let mut decoder = EventDecoder::new();
        let first = split_event(&mut input).unwrap();
        match decoder.decode(first).unwrap() {
            Event::Xid(e) => assert_eq!(1, e.data.transaction_id),
            other => panic!("unexpected event: {:?}", other),
        }
        let second = split_event(&mut input).unwrap();
        match decoder.decode(second).unwrap() {
            Event::Xid(e) => assert_eq!(2, e.data.transaction_id),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(input.is_empty());
    }

    #[test]
    fn test_split_event_rejects_short_tail() {
        let mut input = Bytes::from_static(&[0u8; 7]);
        assert!(split_event(&mut input).is_err());
    }

    #[test]
    fn test_split_event_rejects_bad_size() {
        let mut payload = xid_payload(1);
        payload[9..13].copy_from_slice(&1u32.to_le_bytes());
        let mut input = Bytes::from(payload);
        assert!(split_event(&mut input).is_err());
    }
}
