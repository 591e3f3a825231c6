//! Line tokenizer: Markdown source to a flat list of blocks.
//!
//! Block precedence at the start of every line, highest first:
//! code fence, heading, rule, table run, list run, blockquote, paragraph.
//! Fenced content is opaque to every other rule.

/// A block-level construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#` to `####` followed by a space.
    Heading { level: u8, text: String },
    /// Consecutive lines that match no other construct.
    Paragraph(Vec<String>),
    /// Content between two ```` ``` ```` lines, verbatim.
    CodeBlock(String),
    /// Bullet items; nesting is flattened to a single level.
    List(Vec<String>),
    /// Header cells and body rows.
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// One `> ` line.
    Quote(String),
    Rule,
}

const MAX_HEADING_LEVEL: usize = 4;

/// Split `source` into blocks. Never fails: anything unrecognized ends up
/// in a paragraph.
pub fn tokenize(source: &str) -> Vec<Block> {
    let lines: Vec<&str> = source.lines().collect();
    let mut blocks = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];

        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            idx += 1;
            continue;
        }

        // Fenced code: runs to the closing fence or the end of the document.
        if is_fence(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let start = idx + 1;
            let end = lines[start..]
                .iter()
                .position(|l| is_fence(l))
                .map(|offset| start + offset);
            let body_end = end.unwrap_or(lines.len());
            blocks.push(Block::CodeBlock(lines[start..body_end].join("\n")));
            idx = end.map_or(lines.len(), |e| e + 1);
            continue;
        }

        if let Some((level, text)) = heading(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
            idx += 1;
            continue;
        }

        if is_rule(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Rule);
            idx += 1;
            continue;
        }

        // A table needs at least two consecutive piped lines.
        let table_len = lines[idx..]
            .iter()
            .take_while(|l| is_table_line(l))
            .count();
        if table_len >= 2 {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(table(&lines[idx..idx + table_len]));
            idx += table_len;
            continue;
        }

        if list_item(line).is_some() {
            flush_paragraph(&mut paragraph, &mut blocks);
            let items: Vec<String> = lines[idx..]
                .iter()
                .map_while(|l| list_item(l))
                .map(str::to_string)
                .collect();
            idx += items.len();
            blocks.push(Block::List(items));
            continue;
        }

        if let Some(text) = quote(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Quote(text.to_string()));
            idx += 1;
            continue;
        }

        paragraph.push(line.to_string());
        idx += 1;
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph(buf: &mut Vec<String>, blocks: &mut Vec<Block>) {
    if !buf.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(buf)));
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > MAX_HEADING_LEVEL {
        return None;
    }
    let text = line[hashes..].strip_prefix(' ')?.trim();
    if text.is_empty() {
        return None;
    }
    Some((hashes as u8, text))
}

fn is_rule(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 3 && line.bytes().all(|b| b == b'-')
}

fn is_table_line(line: &str) -> bool {
    line.contains('|')
}

/// Pipe-delimited cells, trimmed, without the empty cells produced by
/// leading and trailing delimiters.
fn cells(line: &str) -> Vec<String> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    cells.into_iter().map(str::to_string).collect()
}

fn table(lines: &[&str]) -> Block {
    let header = cells(lines[0]);
    // lines[1] is the header/body separator.
    let rows = lines
        .iter()
        .skip(2)
        .map(|l| cells(l))
        .filter(|row| !row.is_empty())
        .collect();
    Block::Table { header, rows }
}

fn list_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let text = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))?;
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

fn quote(line: &str) -> Option<&str> {
    let text = line.strip_prefix("> ")?.trim_end();
    (!text.trim().is_empty()).then_some(text)
}
