//! HTTP endpoint handlers for the observer server.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | HTML dashboard |
//! | `GET` | `/api/state` | Latest snapshot + log ring |
//! | `POST` | `/api/cmd` | Tagged command JSON |
//!
//! The state endpoint serves the original dashboard wire shape: an
//! `ok` flag, flat population tiles, per-kind energy statistics and
//! probabilities, and the log lines newest first.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;

use savanna_types::Command;

use crate::error::ObserverError;
use crate::state::AppState;

/// Serve the dashboard page.
///
/// The page is static: it polls `GET /api/state` every 200 ms and
/// posts control-button commands to `POST /api/cmd`.
#[allow(clippy::unused_async)]
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// Return the latest snapshot and the retained log lines.
///
/// Before the first tick the body is `{"ok": false, "reason": ...}`;
/// the dashboard shows a waiting state until then.
pub async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let logs = state.logs().await;
    let body = state.latest().await.map_or_else(
        || {
            serde_json::json!({
                "ok": false,
                "reason": "no snapshot yet",
                "logs": &logs,
            })
        },
        |s| {
            serde_json::json!({
                "ok": true,
                "tick": s.tick,
                "preys": s.prey,
                "predators": s.predators,
                "grass": s.grass,
                "drought": s.drought,
                "prey_energy": s.prey_energy,
                "pred_energy": s.predator_energy,
                "prey_probs": { "eat": s.prey_probs.action, "repro": s.prey_probs.reproduce },
                "pred_probs": { "hunt": s.predator_probs.action, "repro": s.predator_probs.reproduce },
                "logs": &logs,
            })
        },
    );
    Json(body)
}

/// Forward a command to the orchestrator.
///
/// Accepts the tagged shape `{"cmd": "...", "args": {...}}`; malformed
/// bodies are rejected by the JSON extractor before this handler runs.
#[allow(clippy::unused_async)]
pub async fn post_cmd(
    State(state): State<Arc<AppState>>,
    Json(command): Json<Command>,
) -> Result<impl IntoResponse, ObserverError> {
    state
        .send_command(command)
        .map_err(|_| ObserverError::CommandChannelClosed)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// The dashboard page: tiles, controls, and the log pane.
const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>Savanna</title>
<style>
:root{
  --bg1:#06140e;
  --bg2:#0b2a1d;
  --bg3:#14532d;
  --card: rgba(255,255,255,0.08);
  --border: rgba(255,255,255,0.18);
  --text: #ecfdf5;
  --muted: rgba(236,253,245,0.7);
}
body{
  font-family: Arial, sans-serif;
  margin:0;
  padding: 18px;
  min-height:100vh;
  background: linear-gradient(135deg, var(--bg1), var(--bg2), var(--bg3));
  color: var(--text);
}
h1{margin:0 0 8px;}
.small{color:var(--muted); font-size:12px;}
.grid{display:grid; grid-template-columns:repeat(4,1fr); gap:12px; margin:14px 0;}
.box{background:var(--card); border:1px solid var(--border); border-radius:10px; padding:12px;}
.label{font-size:12px; color:var(--muted);}
.value{font-size:20px; font-weight:bold; margin-top:4px;}
.row{display:flex; gap:10px; flex-wrap:wrap; align-items:center; margin:10px 0;}
button,input{padding:8px 10px; border-radius:8px; border:1px solid var(--border); background:rgba(255,255,255,0.08); color:var(--text);}
button{cursor:pointer; font-weight:bold;}
button:hover{background:rgba(255,255,255,0.18);}
button.primary{border-color: rgba(52,211,153,0.6);}
button.warn{border-color: rgba(245,158,11,0.7);}
button.danger{border-color: rgba(239,68,68,0.7);}
#log{
  white-space:pre-wrap;
  background:rgba(0,0,0,0.25);
  border:1px solid var(--border);
  border-radius:10px;
  padding:10px;
  max-height:260px;
  overflow:auto;
  font-family: monospace;
  font-size:12px;
  color: var(--muted);
}
@media(max-width:900px){ .grid{grid-template-columns:repeat(2,1fr);} }
</style>
</head>
<body>
  <h1>Savanna (Live)</h1>
  <div class="small">Refresh 200 ms. The dashboard talks to the environment through commands only.</div>

  <div class="grid">
    <div class="box">
      <div class="label">Tick</div>
      <div class="value" id="tick">-</div>
      <div class="small">Mode: <span id="mode">-</span></div>
    </div>
    <div class="box">
      <div class="label">Grass</div>
      <div class="value" id="grass">-</div>
    </div>
    <div class="box">
      <div class="label">Preys</div>
      <div class="value" id="preys">-</div>
      <div class="small">Energy (min/avg/max): <span id="preyE">-</span></div>
      <div class="small">Eat: <span id="preyEatP">-</span>% | Repro: <span id="preyRepP">-</span>%</div>
    </div>
    <div class="box">
      <div class="label">Predators</div>
      <div class="value" id="preds">-</div>
      <div class="small">Energy (min/avg/max): <span id="predE">-</span></div>
      <div class="small">Hunt: <span id="predHuntP">-</span>% | Repro: <span id="predRepP">-</span>%</div>
    </div>
  </div>

  <h3>Controls</h3>
  <div class="row">
    <button class="warn" onclick="sendCmd('trigger_drought')">Drought</button>
    <button class="primary" onclick="sendCmd('add_prey',{value:1})">+1 prey</button>
    <button class="primary" onclick="sendCmd('add_predator',{value:1})">+1 predator</button>
    <button class="danger" onclick="sendCmd('reset')">Reset</button>
  </div>

  <h3>Logs</h3>
  <div id="log"></div>

<script>
"use strict";

const logEl = document.getElementById('log');

async function sendCmd(cmd, args){
  try{
    const body = args ? {cmd: cmd, args: args} : {cmd: cmd};
    const res = await fetch('/api/cmd', {
      method:'POST',
      headers:{'Content-Type':'application/json'},
      body: JSON.stringify(body)
    });
    await res.json();
  }catch(e){}
}

async function refresh(){
  try{
    const res = await fetch('/api/state', {cache:'no-store'});
    const s = await res.json();

    if(!s || !s.ok){
      document.getElementById('mode').textContent = 'waiting...';
      return;
    }
    document.getElementById('tick').textContent = s.tick;
    document.getElementById('grass').textContent = s.grass;
    document.getElementById('preys').textContent = s.preys;
    document.getElementById('preds').textContent = s.predators;

    document.getElementById('mode').textContent = s.drought ? 'DROUGHT' : 'NORMAL';

    const pe = s.prey_energy || {min:0, avg:0, max:0};
    const pr = s.pred_energy || {min:0, avg:0, max:0};

    document.getElementById('preyE').textContent =
      `${Number(pe.min).toFixed(0)} / ${Number(pe.avg).toFixed(1)} / ${Number(pe.max).toFixed(0)}`;
    document.getElementById('predE').textContent =
      `${Number(pr.min).toFixed(0)} / ${Number(pr.avg).toFixed(1)} / ${Number(pr.max).toFixed(0)}`;

    const pp = s.prey_probs || {eat:0, repro:0};
    const dp = s.pred_probs || {hunt:0, repro:0};

    document.getElementById('preyEatP').textContent = Math.round(Number(pp.eat) * 100);
    document.getElementById('preyRepP').textContent = Math.round(Number(pp.repro) * 100);
    document.getElementById('predHuntP').textContent = Math.round(Number(dp.hunt) * 100);
    document.getElementById('predRepP').textContent = Math.round(Number(dp.repro) * 100);

    if (Array.isArray(s.logs)) logEl.textContent = s.logs.join("\n");
  }catch(e){}
}

setInterval(refresh, 200);
refresh();
</script>
</body>
</html>
"##;
