//! Live-reload client injected into pages built for the dev server.

/// WebSocket endpoint the dev server exposes for reload notifications.
pub const RELOAD_PATH: &str = "/__reload";

/// Generate the client-side live-reload script.
///
/// Development only: the script connects back to the page's own host and
/// reloads the page whenever the dev server finishes a rebuild.
pub fn reload_client_script() -> String {
    format!(
        r#"
(function() {{
  'use strict';

  var scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
  var attempts = 0;
  var maxAttempts = 10;

  function connect() {{
    var ws = new WebSocket(scheme + location.host + '{}');

    ws.onopen = function() {{
      attempts = 0;
    }};

    ws.onmessage = function(event) {{
      var msg = JSON.parse(event.data);

      switch (msg.type) {{
        case 'reload':
          location.reload();
          break;

        case 'build_failed':
          console.warn('[quire] Build finished with ' + msg.failed + ' failed page(s)');
          break;

        case 'connected':
          console.log('[quire] Live reload connected');
          break;
      }}
    }};

    ws.onclose = function() {{
      if (attempts < maxAttempts) {{
        attempts++;
        setTimeout(connect, 1000 * attempts);
      }}
    }};
  }}

  connect();
}})();
"#,
        RELOAD_PATH
    )
}
