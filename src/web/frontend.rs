//! Embedded HTML/CSS/JS page for `sentimen serve`.
//!
//! The page holds no state of its own. Every element with an `id` is a
//! mirror of the same element in the controller's document: the script posts
//! user events to `/ui/event` and applies the returned snapshot. Charts use
//! Chart.js and wordcloud2 when they load, with a plain canvas fallback.

/// The complete single page.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Sentimen</title>
<script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
<script src="https://cdn.jsdelivr.net/npm/wordcloud@1.2.2/src/wordcloud2.js"></script>
<style>
:root {
  --bg: #f7f8fc;
  --surface: #ffffff;
  --border: #e3e6ef;
  --text: #1f2937;
  --text-muted: #6b7280;
  --accent: #6d8bd6;
  --pos: #a6e3c5;
  --neg: #f5b8c2;
  --neu: #bfd7ee;
  --radius: 10px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}
body.booting { visibility: hidden; }

.hidden { display: none !important; }

/* Layout */
.app { max-width: 1100px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 22px; font-weight: 600; cursor: pointer; }
header nav { display: flex; gap: 12px; align-items: center; }

.nav-link, .nav-button {
  border: none;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  cursor: pointer;
  text-decoration: none;
}
.nav-button { background: var(--accent); color: #fff; padding: 6px 14px; border-radius: 6px; }
.nav-greeting { color: var(--text); font-weight: 500; }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 12px; }
.card h3 { font-size: 14px; font-weight: 600; margin: 12px 0 8px; color: var(--text-muted); }

.persona-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
.persona-card { cursor: pointer; }
.persona-card:hover { border-color: var(--accent); }

/* Tabs */
.tabs {
  display: flex;
  gap: 4px;
  margin-bottom: 16px;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 4px;
}
.tab-btn {
  flex: 1;
  padding: 8px 16px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-weight: 500;
  cursor: pointer;
}
.tab-btn.active { background: var(--accent); color: #fff; }

/* Forms */
textarea, input[type=text], input[type=password], input[type=url] {
  width: 100%;
  padding: 10px;
  border: 1px solid var(--border);
  border-radius: 6px;
  font: inherit;
}
textarea { min-height: 120px; resize: vertical; }
button.primary {
  padding: 8px 18px;
  border: none;
  border-radius: 6px;
  background: var(--accent);
  color: #fff;
  font-weight: 500;
  cursor: pointer;
}
button.secondary {
  padding: 8px 18px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--surface);
  cursor: pointer;
}
button:disabled { opacity: 0.55; cursor: not-allowed; }
.row { display: flex; gap: 8px; align-items: center; margin-top: 8px; }
.muted { color: var(--text-muted); font-size: 12px; }

/* Results */
.sentiment-head { display: flex; gap: 12px; align-items: center; }
.sentiment-head .icon { font-size: 32px; }
.sentiment-head .label { font-size: 20px; font-weight: 600; }
.aspect-item { display: flex; justify-content: space-between; padding: 4px 0; }
.badge { padding: 2px 8px; border-radius: 10px; font-size: 12px; color: #1f2937; }

.bar { height: 10px; border-radius: 5px; transition: width 0.3s; }
.bar.pos { background: var(--pos); }
.bar.neg { background: var(--neg); }
.bar.neu { background: var(--neu); }
.bar-track { background: var(--bg); border-radius: 5px; margin: 4px 0 8px; }

.counts { display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px; }
.count-box { text-align: center; padding: 12px; border-radius: 8px; background: var(--bg); }
.count-box .value { font-size: 22px; font-weight: 600; }

table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid var(--border); vertical-align: top; }
.history-text { max-width: 420px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.history-time { color: var(--text-muted); font-size: 12px; }
.feedback-btn { border: none; background: transparent; cursor: pointer; margin-left: 6px; }

.drop-zone {
  border: 2px dashed var(--border);
  border-radius: var(--radius);
  padding: 32px;
  text-align: center;
  cursor: pointer;
}
.drop-zone.dragover { border-color: var(--accent); background: var(--bg); }

.battle-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.score { font-size: 32px; font-weight: 700; }
.verdict { margin-top: 12px; font-size: 16px; font-weight: 600; text-align: center; }

canvas { width: 100%; max-height: 320px; }

/* Modals */
.modal {
  position: fixed;
  inset: 0;
  background: rgba(15, 23, 42, 0.45);
  display: flex;
  align-items: center;
  justify-content: center;
}
.modal .card { width: 360px; }
.error { color: #b91c1c; font-size: 13px; margin-top: 8px; }
</style>
</head>
<body class="booting">
<div class="app">

<header>
  <h1 data-event="back_to_welcome">Sentimen</h1>
  <nav>
    <button class="nav-link" data-event="show_page" data-args='{"page": "guide"}'>Panduan</button>
    <button class="nav-link" data-event="show_page" data-args='{"page": "about"}'>Tentang</button>
    <span id="auth_buttons"></span>
  </nav>
</header>

<!-- Home -->
<section id="welcome_screen">
  <div class="card">
    <h2>Pilih kebutuhan Anda</h2>
    <div class="persona-grid">
      <div class="card persona-card" data-event="show_page" data-args='{"page": "umkm"}'>
        <h2>UMKM</h2><p class="muted">Analisis ulasan pelanggan satu per satu atau lewat file.</p>
      </div>
      <div class="card persona-card" data-event="show_page" data-args='{"page": "creator"}'>
        <h2>Kreator</h2><p class="muted">Baca sentimen komentar video YouTube Anda.</p>
      </div>
      <div class="card persona-card" data-event="show_page" data-args='{"page": "brand"}'>
        <h2>Brand</h2><p class="muted">Bandingkan sentimen dua video dalam satu battle.</p>
      </div>
    </div>
  </div>
</section>

<section id="guide_view">
  <div class="card">
    <h2>Panduan</h2>
    <p>Ketik ulasan lalu tekan Analisis, atau unggah file CSV/Excel berisi kolom teks untuk analisis massal.</p>
    <p>Tempel URL YouTube untuk membaca komentar, dan login untuk melihat dashboard.</p>
    <div class="row"><button class="secondary" data-event="back_to_welcome">Kembali</button></div>
  </div>
</section>

<section id="about_view">
  <div class="card">
    <h2>Tentang</h2>
    <p>Analisis sentimen berbahasa Indonesia: Positif, Negatif, atau Netral.</p>
    <div class="row"><button class="secondary" data-event="back_to_welcome">Kembali</button></div>
  </div>
</section>

<!-- Persona pages -->
<section id="umkm_page">
  <div class="tabs">
    <button id="umkm_tab_single" class="tab-btn" data-event="switch_tab" data-args='{"tab": "analyze"}'>Analisis Teks</button>
    <button id="umkm_tab_batch" class="tab-btn" data-event="switch_tab" data-args='{"tab": "batch"}'>Analisis File</button>
    <button id="umkm_tab_dashboard" class="tab-btn" data-event="switch_tab" data-args='{"tab": "dashboard"}'>Dashboard</button>
  </div>
</section>
<section id="creator_page">
  <div class="tabs">
    <button id="creator_tab_youtube" class="tab-btn" data-event="switch_tab" data-args='{"tab": "social"}'>YouTube</button>
    <button id="creator_tab_dashboard" class="tab-btn" data-event="switch_tab" data-args='{"tab": "dashboard"}'>Dashboard</button>
  </div>
</section>
<section id="brand_page">
  <div class="tabs">
    <button id="brand_tab_youtube" class="tab-btn" data-event="switch_tab" data-args='{"tab": "social"}'>YouTube</button>
    <button id="brand_tab_battle" class="tab-btn" data-event="switch_tab" data-args='{"tab": "battle"}'>Brand Battle</button>
    <button id="brand_tab_dashboard" class="tab-btn" data-event="switch_tab" data-args='{"tab": "dashboard"}'>Dashboard</button>
  </div>
</section>

<!-- Single analysis -->
<section id="analyze_view">
  <div class="card">
    <h2>Analisis Teks</h2>
    <textarea id="inputText" maxlength="500" placeholder="Tulis ulasan di sini..."></textarea>
    <div class="row">
      <span id="charCount" class="muted">0 / 500 karakter</span>
      <button id="clearBtn" class="secondary" data-event="clear_input">Hapus</button>
      <button id="analyzeBtn" class="primary" data-event="analyze_sentiment">Analisis</button>
    </div>
  </div>
  <div id="resultCard" class="card">
    <div class="sentiment-head">
      <span id="sentimentIcon" class="icon"></span>
      <div>
        <div id="sentimentLabel" class="label"></div>
        <div id="sentimentDesc" class="muted"></div>
      </div>
    </div>
    <p class="muted">Keyakinan: <span id="confidenceScore"></span></p>
    <div id="aspectSection">
      <h3>Aspek</h3>
      <div id="aspectList"></div>
    </div>
  </div>
  <div class="card">
    <h2>Statistik</h2>
    <p class="muted">Total: <span id="totalCount">0</span></p>
    <div class="bar-track"><div id="barPos" class="bar pos"></div></div>
    <div class="bar-track"><div id="barNeg" class="bar neg"></div></div>
    <div class="bar-track"><div id="barNeu" class="bar neu"></div></div>
    <div class="counts">
      <div class="count-box"><div id="countPos" class="value">0</div>Positif</div>
      <div class="count-box"><div id="countNeg" class="value">0</div>Negatif</div>
      <div class="count-box"><div id="countNeu" class="value">0</div>Netral</div>
    </div>
  </div>
  <div class="card">
    <div class="row" style="justify-content: space-between">
      <h2>Riwayat</h2>
      <button id="clearHistoryBtn" class="secondary" data-event="clear_history">Hapus Riwayat</button>
    </div>
    <table><tbody id="historyList"></tbody></table>
  </div>
</section>

<!-- Batch -->
<section id="batch_view">
  <div class="card">
    <h2>Analisis File</h2>
    <div id="dropZone" class="drop-zone">
      <p>Tarik file CSV/Excel ke sini atau klik untuk memilih.</p>
      <input id="batchFile" type="file" accept=".csv,.xlsx" class="hidden">
    </div>
    <div id="fileInfo" class="row">
      <span id="fileName"></span>
      <button id="removeFileBtn" class="secondary" data-event="remove_file">Hapus</button>
    </div>
    <div class="row"><button id="analyzeBatchBtn" class="primary" data-event="analyze_batch" disabled>Proses File</button></div>
  </div>
  <div id="batchResult" class="card">
    <div class="counts">
      <div class="count-box"><div id="batchPos" class="value">0</div>Positif</div>
      <div class="count-box"><div id="batchNeg" class="value">0</div>Negatif</div>
      <div class="count-box"><div id="batchNeu" class="value">0</div>Netral</div>
    </div>
    <div id="batchProducts"></div>
    <div id="batchInsights"></div>
    <div class="row" style="justify-content: space-between">
      <h3>Pratinjau</h3>
      <button id="downloadCsvBtn" class="secondary">Unduh CSV</button>
    </div>
    <table>
      <thead id="batchTableHead"></thead>
      <tbody id="batchTableBody"></tbody>
    </table>
  </div>
</section>

<!-- YouTube -->
<section id="social_view">
  <div class="card">
    <h2>Analisis Komentar YouTube</h2>
    <input id="socialUrl" type="url" placeholder="https://www.youtube.com/watch?v=...">
    <div class="row"><button id="analyzeSocialBtn" class="primary" data-event="analyze_social">Analisis</button></div>
  </div>
  <div id="socialResult" class="card">
    <div class="counts">
      <div class="count-box"><div id="socialPos" class="value">0</div>Positif</div>
      <div class="count-box"><div id="socialNeg" class="value">0</div>Negatif</div>
      <div class="count-box"><div id="socialNeu" class="value">0</div>Netral</div>
    </div>
    <h3>Komentar</h3>
    <div id="socialCommentsList"></div>
    <div class="row">
      <input id="saveAnalysisLabel" type="text" placeholder="Nama analisis">
      <button id="saveYoutubeBtn" class="primary" data-event="save_youtube">Simpan</button>
    </div>
  </div>
</section>

<!-- Dashboard -->
<section id="dashboard_view">
  <div id="dashboard_login_msg" class="card">
    <p>Silakan login untuk melihat dashboard.</p>
    <div class="row"><button class="primary" data-event="open_login">Masuk</button></div>
  </div>
  <div id="dashboard_content">
    <div class="counts">
      <div class="card count-box"><div id="total_analyses" class="value">0</div>Total Analisis</div>
      <div class="card count-box"><div id="positive_count" class="value">0</div>Positif</div>
      <div class="card count-box"><div id="negative_count" class="value">0</div>Negatif</div>
    </div>
    <div class="card"><h2>Tren</h2><canvas id="trendChart" height="260"></canvas></div>
    <div class="card">
      <h2>Kata Populer</h2>
      <p id="wordcloud_loading" class="muted">Memuat...</p>
      <canvas id="wordCloudCanvas" width="800" height="320"></canvas>
    </div>
  </div>
</section>

<!-- Battle -->
<section id="battle_view">
  <div class="card">
    <h2>Brand Battle</h2>
    <div class="battle-grid">
      <input id="battleUrlA" type="url" placeholder="URL video A">
      <input id="battleUrlB" type="url" placeholder="URL video B">
    </div>
    <div class="row"><button id="startBattleBtn" class="primary" data-event="start_battle">Mulai Battle</button></div>
  </div>
  <div id="battleResult" class="card">
    <div class="battle-grid">
      <div><h3>Video A</h3><div id="scoreA" class="score"></div><p>Positif <span id="posA"></span> / Negatif <span id="negA"></span></p></div>
      <div><h3>Video B</h3><div id="scoreB" class="score"></div><p>Positif <span id="posB"></span> / Negatif <span id="negB"></span></p></div>
    </div>
    <div id="battleVerdict" class="verdict"></div>
  </div>
</section>

</div>

<!-- Login -->
<div id="loginModal" class="modal">
  <div class="card">
    <h2>Masuk</h2>
    <input id="loginUsername" type="text" placeholder="Username">
    <div style="height: 8px"></div>
    <input id="loginPassword" type="password" placeholder="Password">
    <div id="loginError" class="error"></div>
    <div class="row">
      <button class="secondary" data-event="close_login">Batal</button>
      <button id="confirmLoginBtn" class="primary" data-event="login">Masuk</button>
    </div>
  </div>
</div>

<!-- Feedback -->
<div id="feedbackModal" class="modal">
  <div class="card">
    <h2>Koreksi Sentimen</h2>
    <input id="feedbackAnalysisId" type="hidden">
    <p class="muted">Sentimen yang benar:</p>
    <div class="row">
      <button class="secondary" data-event="submit_feedback" data-args='{"correction": "Positif"}'>Positif</button>
      <button class="secondary" data-event="submit_feedback" data-args='{"correction": "Negatif"}'>Negatif</button>
      <button class="secondary" data-event="submit_feedback" data-args='{"correction": "Netral"}'>Netral</button>
    </div>
    <div class="row"><button class="secondary" data-event="close_feedback">Batal</button></div>
  </div>
</div>

<script>
'use strict';

// Fields the server reads on every event.
const FIELDS = ['inputText', 'loginUsername', 'loginPassword', 'socialUrl',
                'saveAnalysisLabel', 'battleUrlA', 'battleUrlB'];

// Markup and classes from the page itself, restored when the server
// leaves an element's content or classes unset.
const original = {};
let trendChart = null;
let busy = false;

function rememberOriginals() {
  document.querySelectorAll('[id]').forEach(el => {
    const base = el.className.split(/\s+/).filter(c => c && c !== 'hidden' && c !== 'active');
    original[el.id] = { html: el.innerHTML, base: base };
  });
}

function collectFields() {
  const fields = {};
  for (const id of FIELDS) {
    const el = document.getElementById(id);
    if (el) fields[id] = el.value;
  }
  return fields;
}

// ---------------------------------------------------------------------------
// Snapshot application
// ---------------------------------------------------------------------------

function applyElement(el, state) {
  const orig = original[el.id] || { html: '', base: [] };
  const classes = new Set(orig.base.concat(state.classes));
  el.className = Array.from(classes).join(' ');

  if (state.content === null) {
    if (el.innerHTML !== orig.html && el.tagName !== 'TEXTAREA') el.innerHTML = orig.html;
  } else if (state.content.kind === 'text') {
    if (el.textContent !== state.content.value) el.textContent = state.content.value;
  } else if (el.innerHTML !== state.content.value) {
    el.innerHTML = state.content.value;
  }

  el.removeAttribute('style');
  for (const [prop, value] of Object.entries(state.style)) {
    el.style.setProperty(prop, value);
  }

  if ('disabled' in el) el.disabled = state.disabled;
  if ('value' in el && el.type !== 'file' && el.value !== state.value && document.activeElement !== el) {
    el.value = state.value;
  }
  if (el.type === 'file' && state.value === '') el.value = '';

  if (state.data.chart && el.dataset.drawnChart !== state.data.chart) {
    el.dataset.drawnChart = state.data.chart;
    drawChart(el, JSON.parse(state.data.chart));
  }
  if (state.data.cloud && el.dataset.drawnCloud !== state.data.cloud) {
    el.dataset.drawnCloud = state.data.cloud;
    drawCloud(el, JSON.parse(state.data.cloud));
  }
}

function applySnapshot(snapshot) {
  for (const [id, state] of Object.entries(snapshot.elements)) {
    const el = document.getElementById(id);
    if (el) applyElement(el, state);
  }
  document.body.classList.remove('booting');
  for (const message of snapshot.alerts) window.alert(message);
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

function drawChart(canvas, chart) {
  if (window.Chart) {
    if (trendChart) trendChart.destroy();
    trendChart = new window.Chart(canvas, {
      type: 'line',
      data: {
        labels: chart.labels,
        datasets: chart.datasets.map(d => Object.assign({ fill: true, tension: 0.3 }, d)),
      },
      options: { responsive: true, plugins: { legend: { position: 'bottom' } } },
    });
    return;
  }

  const ctx = canvas.getContext('2d');
  const w = canvas.width = canvas.clientWidth || 800;
  const h = canvas.height;
  ctx.clearRect(0, 0, w, h);
  const max = Math.max(1, ...chart.datasets.flatMap(d => d.data));
  const step = chart.labels.length > 1 ? (w - 40) / (chart.labels.length - 1) : 0;
  for (const d of chart.datasets) {
    ctx.strokeStyle = d.borderColor;
    ctx.lineWidth = 2;
    ctx.beginPath();
    d.data.forEach((v, i) => {
      const x = 20 + i * step;
      const y = h - 20 - (v / max) * (h - 40);
      if (i === 0) ctx.moveTo(x, y); else ctx.lineTo(x, y);
    });
    ctx.stroke();
  }
}

function drawCloud(canvas, terms) {
  if (window.WordCloud) {
    window.WordCloud(canvas, { list: terms, backgroundColor: 'transparent' });
    return;
  }

  const ctx = canvas.getContext('2d');
  ctx.clearRect(0, 0, canvas.width, canvas.height);
  let x = 10;
  let y = 10;
  let line = 0;
  for (const [word, size] of terms) {
    ctx.font = `${size}px sans-serif`;
    const width = ctx.measureText(word).width;
    if (x + width > canvas.width - 10) {
      x = 10;
      y += line + 6;
      line = 0;
    }
    if (y + size > canvas.height) break;
    ctx.fillStyle = '#4b5563';
    ctx.textBaseline = 'top';
    ctx.fillText(word, x, y);
    x += width + 12;
    line = Math.max(line, size);
  }
}

// ---------------------------------------------------------------------------
// Server calls
// ---------------------------------------------------------------------------

async function request(url, options) {
  try {
    const res = await fetch(url, options);
    const body = await res.json();
    if (!res.ok) {
      console.error(body.error || res.statusText);
      return;
    }
    applySnapshot(body);
  } catch (e) {
    console.error(e);
  }
}

async function sendEvent(action) {
  if (busy) return;
  busy = true;
  try {
    await request('/ui/event', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ action: action, fields: collectFields() }),
    });
  } finally {
    busy = false;
  }
}

async function upload(file) {
  if (!file) return;
  await request('/ui/upload?name=' + encodeURIComponent(file.name), {
    method: 'POST',
    body: await file.arrayBuffer(),
  });
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

document.addEventListener('click', e => {
  const target = e.target.closest('[data-event]');
  if (!target) return;
  e.preventDefault();
  const args = target.dataset.args ? JSON.parse(target.dataset.args) : {};
  sendEvent(Object.assign({ event: target.dataset.event }, args));
});

document.getElementById('inputText').addEventListener('input', () => sendEvent({ event: 'input' }));

document.getElementById('downloadCsvBtn').addEventListener('click', () => {
  window.location.href = '/ui/export.csv';
});

const dropZone = document.getElementById('dropZone');
const batchFile = document.getElementById('batchFile');
dropZone.addEventListener('click', e => {
  if (e.target !== batchFile) batchFile.click();
});
batchFile.addEventListener('change', () => upload(batchFile.files[0]));
dropZone.addEventListener('dragover', e => {
  e.preventDefault();
  dropZone.classList.add('dragover');
});
dropZone.addEventListener('dragleave', () => dropZone.classList.remove('dragover'));
dropZone.addEventListener('drop', e => {
  e.preventDefault();
  dropZone.classList.remove('dragover');
  upload(e.dataTransfer.files[0]);
});

rememberOriginals();
request('/ui/state');
</script>
</body>
</html>
"##;
