//! Built-in page layout.
//!
//! Used as the static artifact when no static compiler command is configured.
//! Layouts are minijinja templates rendered once per page with:
//!
//! - `title`, `site_title`, `base_url`
//! - `content`: the page body as HTML
//! - `toc`: list of `{title, id, level}` headings
//! - `preamble`: the page preamble as an object, `flags` the same as JSON
//! - `module`: client module named by the preamble, if any
//! - `app_js`: URL of the hydration script, empty when there is none
//! - `auto_reload`, `reload_script`: live-reload instrumentation

pub const DEFAULT_LAYOUT: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if title != site_title %}{{ title|e }} - {% endif %}{{ site_title|e }}</title>
  <link rel="stylesheet" href="{{ base_url }}style.css">
</head>
<body>
  <main id="main">
    <article class="content">
{{ content }}
    </article>
  </main>
  {% if app_js %}<script src="{{ app_js }}"></script>
  <script>
    (function() {
      var flags = {{ flags }};
      var name = {{ module_json }};
      var target = (name || '').split('.').reduce(function(o, k) { return o && o[k]; }, window.Elm);
      if (target && target.init) {
        target.init({ node: document.getElementById('main'), flags: flags });
      }
    })();
  </script>{% endif %}
  {% if auto_reload %}<script>{{ reload_script }}</script>{% endif %}
</body>
</html>
"##;
