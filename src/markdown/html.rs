//! HTML emission for tokenized blocks.

use super::block::Block;
use super::inline::{escape, render_inline};

/// Emit an HTML fragment, one block per line group.
pub fn emit(blocks: &[Block]) -> String {
    blocks.iter().map(emit_block).collect::<Vec<_>>().join("\n")
}

fn emit_block(block: &Block) -> String {
    match block {
        Block::Heading { level, text } => {
            format!("<h{level}>{}</h{level}>", render_inline(text))
        }
        Block::Paragraph(lines) => {
            let body: Vec<String> = lines.iter().map(|l| render_inline(l)).collect();
            format!("<p>{}</p>", body.join("\n"))
        }
        Block::CodeBlock(code) => format!("<pre><code>{}</code></pre>", escape(code)),
        Block::List(items) => {
            let mut out = String::from("<ul>\n");
            for item in items {
                out.push_str(&format!("<li>{}</li>\n", render_inline(item)));
            }
            out.push_str("</ul>");
            out
        }
        Block::Table { header, rows } => {
            let mut out = String::from("<table>\n<thead><tr>");
            for cell in header {
                out.push_str(&format!("<th>{}</th>", render_inline(cell)));
            }
            out.push_str("</tr></thead>\n<tbody>\n");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    out.push_str(&format!("<td>{}</td>", render_inline(cell)));
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody></table>");
            out
        }
        Block::Quote(text) => format!("<blockquote>{}</blockquote>", render_inline(text)),
        Block::Rule => "<hr>".to_string(),
    }
}
