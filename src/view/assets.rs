//! Static stylesheet and client script of the page

pub const STYLE: &str = r#"
:root { --bg: #101418; --card: #1b2129; --fg: #e6e6e6; --accent: #3fb950; --danger: #f85149; --muted: #8b949e; }
* { box-sizing: border-box; }
body { margin: 0; font-family: ui-monospace, monospace; background: var(--bg); color: var(--fg); }
header { display: flex; align-items: center; gap: 1rem; padding: 1rem 1.5rem; }
h1 { font-size: 1.25rem; margin: 0; }
#timers { display: grid; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); gap: 1rem; padding: 0 1.5rem 1.5rem; }
.timer { background: var(--card); border-radius: 8px; padding: 1rem; display: flex; flex-direction: column; gap: 0.75rem; }
.timer.alarming { outline: 2px solid var(--danger); outline-offset: -2px; }
.top { display: flex; gap: 0.5rem; }
.name { flex: 1; background: transparent; color: var(--fg); border: 1px solid var(--muted); border-radius: 4px; padding: 0.25rem 0.5rem; }
.remove { background: transparent; color: var(--muted); border: none; font-size: 1.25rem; cursor: pointer; }
.duration { display: flex; align-items: center; gap: 0.25rem; }
.duration input { width: 3.5rem; background: transparent; color: var(--fg); border: 1px solid var(--muted); border-radius: 4px; padding: 0.25rem; }
.display { font-size: 2.5rem; text-align: center; letter-spacing: 0.05em; }
.barWrap { height: 6px; background: #30363d; border-radius: 3px; overflow: hidden; }
.bar { height: 100%; background: var(--accent); transition: width 0.2s linear; }
.controls { display: flex; flex-wrap: wrap; gap: 0.5rem; }
.btn { border: none; border-radius: 4px; padding: 0.4rem 0.8rem; cursor: pointer; background: #30363d; color: var(--fg); }
.btn:disabled { opacity: 0.4; cursor: default; }
.btn.start { background: var(--accent); color: #000; }
.btn.pause { background: #d29922; color: #000; }
.btn.stopAlarm { background: var(--danger); color: #fff; }
"#;

/// Polls `/cards`, forwards clicks and edits to the JSON routes and plays
/// `/alarm.wav` for every new alarm pulse. Audio starts only after the first
/// click on the page.
pub const SCRIPT: &str = r#"
(() => {
  const timersEl = document.getElementById('timers');
  const addTimerBtn = document.getElementById('addTimerBtn');
  const seenPulses = new Map();
  let revision = timersEl.dataset.revision;
  let audioUnlocked = false;

  const unlockAudio = () => { audioUnlocked = true; };

  function playPulses() {
    for (const card of timersEl.querySelectorAll('.timer')) {
      const id = card.dataset.id;
      const pulses = Number(card.dataset.pulses) || 0;
      if (audioUnlocked && card.classList.contains('alarming') && pulses > (seenPulses.get(id) || 0)) {
        new Audio('/alarm.wav').play().catch(() => {});
      }
      seenPulses.set(id, pulses);
    }
  }

  // The field being edited survives a card swap with its text and caret
  function saveFocus() {
    const active = document.activeElement;
    if (!active || active.tagName !== 'INPUT' || !timersEl.contains(active)) return null;
    const card = active.closest('.timer');
    const field = ['name', 'h', 'm', 's'].find((c) => active.classList.contains(c));
    if (!card || !field) return null;
    let selection = null;
    try { selection = [active.selectionStart, active.selectionEnd]; } catch (_) {}
    return { id: card.dataset.id, field, value: active.value, selection };
  }

  function restoreFocus(saved) {
    if (!saved) return;
    const input = timersEl.querySelector(`.timer[data-id="${saved.id}"] input.${saved.field}`);
    if (!input || input.disabled) return;
    input.value = saved.value;
    input.focus();
    if (saved.selection && saved.selection[0] !== null) {
      try { input.setSelectionRange(saved.selection[0], saved.selection[1]); } catch (_) {}
    }
  }

  async function refresh(force) {
    try {
      const res = await fetch('/cards');
      const next = res.headers.get('x-board-revision');
      if (!force && next === revision) return;
      const html = await res.text();
      const saved = saveFocus();
      revision = next;
      timersEl.innerHTML = html;
      restoreFocus(saved);
      playPulses();
    } catch (_) {}
  }

  async function send(method, url, body) {
    try {
      await fetch(url, {
        method,
        headers: { 'Content-Type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body),
      });
    } catch (_) {}
    await refresh(true);
  }

  timersEl.addEventListener('click', (e) => {
    unlockAudio();
    const btn = e.target.closest('button[data-action]');
    if (!btn || btn.disabled) return;
    const id = btn.closest('.timer').dataset.id;
    const action = btn.dataset.action;
    if (action === 'remove') send('DELETE', `/timers/${id}`);
    else send('POST', `/timers/${id}/${action}`);
  });

  timersEl.addEventListener('change', (e) => {
    const card = e.target.closest('.timer');
    if (!card || !e.target.closest('.duration')) return;
    send('PUT', `/timers/${card.dataset.id}/duration`, {
      hours: card.querySelector('.h').value,
      minutes: card.querySelector('.m').value,
      seconds: card.querySelector('.s').value,
    });
  });

  timersEl.addEventListener('input', (e) => {
    if (!e.target.classList.contains('name')) return;
    const card = e.target.closest('.timer');
    fetch(`/timers/${card.dataset.id}/name`, {
      method: 'PUT',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ name: e.target.value }),
    }).catch(() => {});
  });

  addTimerBtn.addEventListener('click', () => {
    unlockAudio();
    send('POST', '/timers', {});
  });

  playPulses();
  setInterval(() => refresh(false), 250);
})();
"#;
