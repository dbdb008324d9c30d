//! Embedded chat page.
//!
//! Single-file browser UI for trying the chatbot without the mobile app:
//! conversation list, transcript pane, input box, all against the JSON API.

use axum::response::Html;

const CHAT_PAGE_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Nikoo Support Chat</title>
  <style>
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: #f5f5f5; color: #222;
      display: flex; height: 100vh;
    }
    aside {
      width: 280px; background: #fff; border-right: 1px solid #e0e0e0;
      display: flex; flex-direction: column;
    }
    aside header { padding: 1rem; border-bottom: 1px solid #e0e0e0; }
    aside header button {
      width: 100%; padding: 0.5rem; border: none; border-radius: 8px;
      background: #2196F3; color: #fff; cursor: pointer; font-size: 0.9rem;
    }
    #conversations { flex: 1; overflow-y: auto; }
    .conv {
      display: flex; align-items: center; gap: 0.5rem;
      padding: 0.75rem 1rem; cursor: pointer; border-bottom: 1px solid #f0f0f0;
    }
    .conv:hover, .conv.active { background: #e3f2fd; }
    .conv .title { flex: 1; overflow: hidden; white-space: nowrap; text-overflow: ellipsis; }
    .conv .count { color: #888; font-size: 0.8rem; }
    .conv .del { border: none; background: none; cursor: pointer; color: #c62828; }
    main { flex: 1; display: flex; flex-direction: column; }
    #messages { flex: 1; overflow-y: auto; padding: 1.5rem; }
    .msg { display: flex; margin-bottom: 1rem; }
    .msg.user { justify-content: flex-end; }
    .msg .bubble {
      max-width: 70%; padding: 0.5rem 1rem; border-radius: 0.5rem;
      white-space: pre-wrap;
    }
    .msg.user .bubble { background: #2196F3; color: #fff; }
    .msg.ai .bubble { background: #fff; border: 1px solid #e0e0e0; }
    form {
      display: flex; gap: 0.5rem; padding: 1rem; background: #fff;
      border-top: 1px solid #e0e0e0;
    }
    form input {
      flex: 1; padding: 0.6rem; border: 1px solid #ccc; border-radius: 8px;
      font-size: 0.95rem;
    }
    form button {
      padding: 0.6rem 1.5rem; border: none; border-radius: 8px;
      background: #2196F3; color: #fff; cursor: pointer;
    }
    form button:disabled { opacity: 0.5; cursor: wait; }
    .hint { color: #888; text-align: center; margin-top: 3rem; }
  </style>
</head>
<body>
  <aside>
    <header><button id="new-conv">+ New Conversation</button></header>
    <div id="conversations"></div>
  </aside>
  <main>
    <div id="messages"><p class="hint">Select a conversation or start a new one.</p></div>
    <form id="composer">
      <input id="input" placeholder="Type your message here..." autocomplete="off" />
      <button id="send" type="submit">Send</button>
    </form>
  </main>
  <script>
    const API = '/api';
    let current = null;

    async function api(path, options) {
      const resp = await fetch(API + path, Object.assign({
        headers: { 'Content-Type': 'application/json' },
      }, options));
      if (resp.status === 204) return null;
      const body = await resp.json();
      if (!resp.ok) throw new Error(body.message || resp.statusText);
      return body;
    }

    async function refreshConversations() {
      const data = await api('/conversations');
      const list = document.getElementById('conversations');
      list.innerHTML = '';
      for (const conv of data.conversations) {
        const row = document.createElement('div');
        row.className = 'conv' + (conv.id === current ? ' active' : '');
        const title = document.createElement('span');
        title.className = 'title';
        title.textContent = conv.title;
        const count = document.createElement('span');
        count.className = 'count';
        count.textContent = conv.messageCount;
        const del = document.createElement('button');
        del.className = 'del';
        del.textContent = '×';
        del.onclick = async (e) => {
          e.stopPropagation();
          await api('/conversations/' + conv.id, { method: 'DELETE' });
          if (current === conv.id) { current = null; renderMessages([]); }
          refreshConversations();
        };
        row.onclick = () => select(conv.id);
        row.append(title, count, del);
        list.appendChild(row);
      }
    }

    function renderMessages(messages) {
      const pane = document.getElementById('messages');
      pane.innerHTML = '';
      if (!current) {
        pane.innerHTML = '<p class="hint">Select a conversation or start a new one.</p>';
        return;
      }
      if (messages.length === 0) {
        appendBubble('ai', "Hello! Welcome to your app. I'm here to help you. What's your name?");
        return;
      }
      for (const msg of messages) appendBubble(msg.sender, msg.content);
      pane.scrollTop = pane.scrollHeight;
    }

    function appendBubble(sender, content) {
      const pane = document.getElementById('messages');
      const msg = document.createElement('div');
      msg.className = 'msg ' + (sender === 'user' ? 'user' : 'ai');
      const bubble = document.createElement('div');
      bubble.className = 'bubble';
      bubble.textContent = content;
      msg.appendChild(bubble);
      pane.appendChild(msg);
      pane.scrollTop = pane.scrollHeight;
    }

    async function select(id) {
      current = id;
      const messages = await api('/conversations/' + id + '/messages');
      renderMessages(messages);
      refreshConversations();
    }

    document.getElementById('new-conv').onclick = async () => {
      const conv = await api('/conversations', { method: 'POST' });
      await select(conv.id);
    };

    document.getElementById('composer').onsubmit = async (e) => {
      e.preventDefault();
      const input = document.getElementById('input');
      const content = input.value.trim();
      if (!content || !current) return;
      const send = document.getElementById('send');
      send.disabled = true;
      appendBubble('user', content);
      input.value = '';
      try {
        const reply = await api('/conversations/' + current + '/messages', {
          method: 'POST',
          body: JSON.stringify({ content }),
        });
        appendBubble(reply.sender, reply.content);
      } catch (err) {
        appendBubble('ai', 'Failed to send message. Please try again.');
      } finally {
        send.disabled = false;
        refreshConversations();
      }
    };

    refreshConversations();
  </script>
</body>
</html>
"#;

/// `GET /ui` — serve the embedded chat page.
pub async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_is_complete_html() {
        assert!(CHAT_PAGE_HTML.starts_with("<!doctype html>"));
        assert!(CHAT_PAGE_HTML.contains("</html>"));
        // The page drives the same API the mobile app uses
        assert!(CHAT_PAGE_HTML.contains("/conversations"));
    }
}
