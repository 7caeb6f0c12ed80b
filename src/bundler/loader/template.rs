//! Loader module templates.
//!
//! Each template binds the addon through one call: Node's `require` applied
//! to `<directory of this module>/<file_name>`. The build-time output
//! directory never appears in the rendered text.

/// ES module loader.
pub const ESM_TEMPLATE: &str = r#"import { createRequire } from 'module';
import { fileURLToPath } from 'url';
import { dirname, join } from 'path';

const require = createRequire(import.meta.url);
const __filename = fileURLToPath(import.meta.url);
const __dirname = dirname(__filename);

const addon = require(join(__dirname, {{file_name}}));
{{#if announce}}

console.log('Node.js addon loaded:', {{file_name}});
console.log('Available exports:', Object.keys(addon));
{{/if}}

export default addon;
"#;

/// CommonJS loader.
pub const CJS_TEMPLATE: &str = r#"'use strict';

const { join } = require('path');

const addon = require(join(__dirname, {{file_name}}));
{{#if announce}}

console.log('Node.js addon loaded:', {{file_name}});
console.log('Available exports:', Object.keys(addon));
{{/if}}

module.exports = addon;
"#;
