//! Built-in viewer page.
//!
//! Served at `/` when the configured viewer file does not exist, so the
//! server is usable with no files deployed next to it.

use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = r##"
body {
    margin: 0;
    background: #000;
    color: #ddd;
    font-family: 'JetBrains Mono', 'Fira Code', 'Cascadia Mono', monospace;
}

#status {
    position: fixed;
    top: 4px;
    right: 8px;
    color: #666;
    font-size: 11px;
}

#screen {
    margin: 0;
    padding: 8px;
    font-size: 13px;
    line-height: 1.15;
    white-space: pre;
}
"##;

const JAVASCRIPT: &str = r##"
const screen = document.getElementById('screen');
const status = document.getElementById('status');
let cells = new Array(COLS * ROWS).fill([' ', null, null, 0]);

function esc(ch) {
    if (ch === '&') return '&amp;';
    if (ch === '<') return '&lt;';
    if (ch === '>') return '&gt;';
    return ch;
}

function styleOf(cell) {
    let style = '';
    if (cell[1]) style += 'color:#' + cell[1] + ';';
    if (cell[2]) style += 'background:#' + cell[2] + ';';
    if (cell[3]) style += 'font-weight:bold;';
    return style;
}

// Rebuild the whole <pre>, merging runs of identically styled cells into
// one span so a full grid stays a few hundred nodes instead of COLS*ROWS.
function render() {
    let out = '';
    for (let row = 0; row < ROWS; row++) {
        let runStyle = null;
        for (let col = 0; col < COLS; col++) {
            const cell = cells[row * COLS + col] || [' ', null, null, 0];
            const style = styleOf(cell);
            if (style !== runStyle) {
                if (runStyle) out += '</span>';
                if (style) out += '<span style="' + style + '">';
                runStyle = style;
            }
            out += esc(cell[0]);
        }
        if (runStyle) out += '</span>';
        out += '\n';
    }
    screen.innerHTML = out;
}

const source = new EventSource('/stream');
source.onopen = () => { status.textContent = ''; };
source.onerror = () => { status.textContent = 'reconnecting'; };
source.onmessage = (event) => {
    const msg = JSON.parse(event.data);
    if (msg.t === 'f') {
        cells = msg.c;
    } else if (msg.t === 'd') {
        for (const [index, ch, fg, bg, weight] of msg.d) {
            cells[index] = [ch, fg, bg, weight];
        }
    }
    render();
};
"##;

/// Render the fallback viewer. Grid dimensions are baked into the page so
/// the client can wrap the row-major cell array without a handshake.
pub fn viewer_page(cols: u16, rows: u16) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "panecast" }
                style { (PreEscaped(CSS)) }
            }
            body {
                div id="status" { "connecting" }
                pre id="screen" {}
                script {
                    (PreEscaped(format!("const COLS = {cols}, ROWS = {rows};")))
                    (PreEscaped(JAVASCRIPT))
                }
            }
        }
    }
}
