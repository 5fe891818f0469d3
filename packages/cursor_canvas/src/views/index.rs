use axum::response::IntoResponse;
use maud::{DOCTYPE, PreEscaped, html};

use super::CSS;

/// The shared canvas page. Self-contained: inline script connects to
/// `/ws`, reports the local pointer, and renders every remote cursor.
pub async fn index_page() -> impl IntoResponse {
    let markup = html! {
        (DOCTYPE)
        html {
            head {
                title { "Cursor Canvas" }
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                style { (PreEscaped(CSS)) }
            }
            body {
                div id="canvas" {
                    div id="hint" { "Move your mouse - everyone connected sees your cursor." }
                }
                script { (PreEscaped(r#"
                    const proto = location.protocol === 'https:' ? 'wss://' : 'ws://';
                    const ws = new WebSocket(proto + location.host + '/ws');
                    const canvas = document.getElementById('canvas');
                    const cursors = new Map();

                    function upsert({ id, x, y }) {
                        let el = cursors.get(id);
                        if (!el) {
                            el = document.createElement('div');
                            el.className = 'cursor';
                            canvas.appendChild(el);
                            cursors.set(id, el);
                        }
                        el.style.left = x + 'px';
                        el.style.top = y + 'px';
                    }

                    function remove(id) {
                        const el = cursors.get(id);
                        if (el) {
                            el.remove();
                            cursors.delete(id);
                        }
                    }

                    ws.addEventListener('open', () => {
                        ws.send(JSON.stringify({ type: 'getState' }));
                    });

                    ws.addEventListener('message', (event) => {
                        const msg = JSON.parse(event.data);
                        switch (msg.type) {
                            case 'gotState':
                                msg.state.forEach(upsert);
                                break;
                            case 'cursorAdded':
                                upsert(msg.cursor);
                                break;
                            case 'cursorsMoved':
                                msg.movedCursors.forEach(upsert);
                                break;
                            case 'cursorRemoved':
                                remove(msg.id);
                                break;
                        }
                    });

                    document.addEventListener('mousemove', (event) => {
                        if (ws.readyState === WebSocket.OPEN) {
                            ws.send(JSON.stringify({
                                type: 'cursorMoved',
                                x: event.clientX,
                                y: event.clientY,
                            }));
                        }
                    });
                "#)) }
            }
        }
    };

    markup
}
