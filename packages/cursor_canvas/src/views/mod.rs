//! Server-rendered pages.

mod index;

pub use index::index_page;

/// Shared page styles.
const CSS: &str = r#"
html, body {
    margin: 0;
    height: 100%;
    overflow: hidden;
    background: #0a0e1a;
    color: #e2e8f0;
    font-family: ui-sans-serif, system-ui, sans-serif;
    cursor: crosshair;
}
#canvas {
    position: relative;
    width: 100%;
    height: 100%;
}
.cursor {
    position: absolute;
    width: 14px;
    height: 14px;
    border-radius: 50% 50% 50% 0;
    background: #4299e1;
    transform-origin: top left;
    rotate: -45deg;
    pointer-events: none;
    transition: left 40ms linear, top 40ms linear;
}
#hint {
    position: absolute;
    bottom: 12px;
    left: 12px;
    font-size: 13px;
    color: #718096;
    pointer-events: none;
}
"#;
