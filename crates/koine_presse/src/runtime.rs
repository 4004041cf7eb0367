//! The browser-side resolver script.
//!
//! The emitted function mirrors [`crate::resolver::Resolver`] exactly: the
//! two are the same algorithm on both sides of the wire. Substitution runs as
//! a single pass over the original text with a function replacer, so values
//! are never rescanned for further placeholders and `$`-sequences in values
//! stay inert.

/// Template of the installed script. Tokens are spliced by
/// [`render_runtime_script`]; the configured values are validated as
/// identifiers / language codes before they get here.
const RUNTIME_TEMPLATE: &str = r#"(function () {
  var ns = window.__NAMESPACE__ = window.__NAMESPACE__ || {};
  if ('t' in ns) {
    return;
  }
  var language = document.documentElement.lang;
  if (!language) {
    throw new Error('The <html> element must declare a "lang" attribute');
  }
  function escapeToken(token) {
    return token.replace(/[.*+?^${}()|[\]\\]/g, '\\$&');
  }
  ns.t = function (category, message, params) {
    var catalog = window.__GLOBAL__;
    if (
      language.toLowerCase() === '__SOURCE_LANGUAGE__' ||
      !catalog ||
      !catalog[language] ||
      !catalog[language][category] ||
      !catalog[language][category][message]
    ) {
      return message;
    }
    var text = catalog[language][category][message];
    if (params) {
      var names = Object.keys(params);
      if (names.length) {
        var pattern = new RegExp('\\{(' + names.map(escapeToken).join('|') + ')\\}', 'g');
        text = text.replace(pattern, function (match, name) {
          return String(params[name]);
        });
      }
    }
    return text;
  };
})();
"#;

/// Render the resolver script for one bundle.
///
/// Installs `<namespace>.t` at most once: a page that includes the artifact
/// twice, or that already customized `t`, is left untouched. Installation
/// throws when the document declares no language, because a silent default
/// would mask missing i18n configuration.
pub fn render_runtime_script(namespace: &str, global_name: &str, source_language: &str) -> String {
    RUNTIME_TEMPLATE
        .replace("__NAMESPACE__", namespace)
        .replace("__GLOBAL__", global_name)
        .replace("__SOURCE_LANGUAGE__", &source_language.to_ascii_lowercase())
}
