use std::collections::HashSet;

use minijinja::{Environment, context};
use tagsplit_core::parse::operation::{HttpMethod, Operation};
use tagsplit_core::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use tagsplit_core::parse::spec::SwaggerDocument;
use tagsplit_core::transform::{normalize_name, route_to_name};

use crate::generator::TypeScriptError;
use crate::type_mapper::{parameter_to_ts, schema_to_ts};

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
fn escape_jsdoc(value: String) -> String {
    value.replace("*/", "*\\/")
}

/// Collapse line breaks so the value stays inside a `//` comment.
fn single_line(value: String) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Emit the client class for one tag-scoped document.
pub fn emit_client(
    class_name: &str,
    spec: &SwaggerDocument,
    no_jsdoc: bool,
) -> Result<String, TypeScriptError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("escape_jsdoc", escape_jsdoc);
    env.add_filter("single_line", single_line);
    env.add_template("client.ts.j2", include_str!("../../templates/client.ts.j2"))?;
    let tmpl = env.get_template("client.ts.j2")?;

    let class_ident = normalize_name(class_name).pascal_case;
    let operations = build_operations(spec, no_jsdoc)?;
    let default_domain = js_string(&spec.base_url());

    Ok(tmpl.render(context! {
        title => spec.title().unwrap_or(class_name),
        class_name => class_ident,
        default_domain => default_domain,
        operations => operations,
    })?)
}

fn build_operations(
    spec: &SwaggerDocument,
    no_jsdoc: bool,
) -> Result<Vec<minijinja::Value>, TypeScriptError> {
    let mut seen_methods = HashSet::new();
    let mut operations = Vec::new();

    for (path, item) in &spec.paths {
        let shared = item
            .shared_parameters()
            .map_err(|source| TypeScriptError::Operation {
                method: "*".to_string(),
                path: path.clone(),
                source,
            })?;

        for (method, value) in item.operations() {
            let op = Operation::from_value(value).map_err(|source| TypeScriptError::Operation {
                method: method.to_string(),
                path: path.clone(),
                source,
            })?;

            let base_name = match op.operation_id {
                Some(ref id) => normalize_name(id).camel_case,
                None => route_to_name(method, path),
            };
            let method_name = unique_method_name(&mut seen_methods, &base_name);
            if method_name != base_name {
                log::warn!("{method} {path}: `{base_name}` is taken, emitting `{method_name}`");
            }

            let params = merge_parameters(spec, &shared, &op.parameters)?;
            operations.push(build_operation(
                method,
                path,
                &method_name,
                &op,
                &params,
                no_jsdoc,
            ));
        }
    }

    Ok(operations)
}

/// `base`, or `base2`, `base3`, ... when earlier operations already use it.
fn unique_method_name(seen: &mut HashSet<String>, base: &str) -> String {
    if seen.insert(base.to_string()) {
        return base.to_string();
    }
    let name = (2..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or_else(|| base.to_string());
    seen.insert(name.clone());
    name
}

/// Resolve path-level and operation-level parameters. An operation parameter
/// replaces a path-level one with the same name and location.
fn merge_parameters(
    spec: &SwaggerDocument,
    shared: &[ParameterOrRef],
    own: &[ParameterOrRef],
) -> Result<Vec<Parameter>, TypeScriptError> {
    let own: Vec<Parameter> = own
        .iter()
        .map(|p| resolve_parameter(spec, p))
        .collect::<Result<_, _>>()?;

    let mut merged = Vec::with_capacity(shared.len() + own.len());
    for p in shared {
        let p = resolve_parameter(spec, p)?;
        if !own
            .iter()
            .any(|o| o.name == p.name && o.location == p.location)
        {
            merged.push(p);
        }
    }
    merged.extend(own);
    Ok(merged)
}

fn resolve_parameter(
    spec: &SwaggerDocument,
    param: &ParameterOrRef,
) -> Result<Parameter, TypeScriptError> {
    match param {
        ParameterOrRef::Parameter(p) => Ok(p.clone()),
        ParameterOrRef::Ref { ref_path } => spec
            .shared_parameter(ref_path)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .ok_or_else(|| TypeScriptError::UnresolvedParameter(ref_path.clone())),
    }
}

fn build_operation(
    method: HttpMethod,
    path: &str,
    method_name: &str,
    op: &Operation,
    params: &[Parameter],
    no_jsdoc: bool,
) -> minijinja::Value {
    let entries = |location: ParameterLocation| -> Vec<minijinja::Value> {
        params
            .iter()
            .filter(|p| p.location == location)
            .map(|p| {
                context! {
                    key => property_key(&p.name),
                    accessor => accessor(&p.name),
                }
            })
            .collect()
    };

    let body = params
        .iter()
        .find(|p| p.location == ParameterLocation::Body)
        .map(|p| accessor(&p.name));

    let doc_lines = if no_jsdoc {
        Vec::new()
    } else {
        doc_lines(op, params)
    };

    context! {
        method_name => method_name,
        http_method => method.as_str(),
        path_expr => path_expression(path, params),
        params_signature => params_signature(params),
        return_type => return_type(op),
        query => entries(ParameterLocation::Query),
        headers => entries(ParameterLocation::Header),
        form => entries(ParameterLocation::FormData),
        body => body,
        doc_lines => doc_lines,
    }
}

/// `parameters: { ... }, options?: RequestOptions`, or just the options when
/// the operation takes no parameters.
fn params_signature(params: &[Parameter]) -> String {
    if params.is_empty() {
        return "options?: RequestOptions".to_string();
    }

    let fields: Vec<String> = params
        .iter()
        .map(|p| {
            let optional = if p.required { "" } else { "?" };
            format!("{}{optional}: {}", property_key(&p.name), parameter_to_ts(p))
        })
        .collect();
    let default = if params.iter().any(|p| p.required) {
        ""
    } else {
        " = {}"
    };

    format!(
        "parameters: {{ {} }}{default}, options?: RequestOptions",
        fields.join("; ")
    )
}

/// Template-literal body for the request path with path parameters interpolated.
fn path_expression(path: &str, params: &[Parameter]) -> String {
    let mut expr = path.replace('`', "\\`").replace("${", "\\${");
    for p in params
        .iter()
        .filter(|p| p.location == ParameterLocation::Path)
    {
        expr = expr.replace(
            &format!("{{{}}}", p.name),
            &format!("${{encodeURIComponent(String({}))}}", accessor(&p.name)),
        );
    }
    expr
}

/// Type of the first 2xx response: its schema when declared, `void` otherwise.
fn return_type(op: &Operation) -> String {
    let success = op
        .responses
        .iter()
        .find(|(code, _)| code.starts_with('2'))
        .map(|(_, response)| response);

    match success {
        Some(response) => response
            .get("schema")
            .map(schema_to_ts)
            .unwrap_or_else(|| "void".to_string()),
        None => "unknown".to_string(),
    }
}

fn doc_lines(op: &Operation, params: &[Parameter]) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(ref summary) = op.summary {
        lines.push(summary.clone());
    }
    if let Some(ref description) = op.description {
        lines.extend(description.lines().map(str::to_string));
    }
    for p in params {
        if let Some(ref description) = p.description {
            lines.push(format!("@param {} {description}", p.name));
        }
    }
    if op.deprecated == Some(true) {
        lines.push("@deprecated".to_string());
    }
    lines
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        js_string(name)
    }
}

fn accessor(name: &str) -> String {
    if is_identifier(name) {
        format!("parameters.{name}")
    } else {
        format!("parameters[{}]", js_string(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn param(name: &str, location: ParameterLocation, required: bool) -> Parameter {
        Parameter {
            name: name.to_string(),
            location,
            description: None,
            required,
            param_type: Some("string".to_string()),
            format: None,
            items: None,
            schema: None,
        }
    }

    #[test]
    fn test_property_key_and_accessor() {
        assert_eq!(property_key("petId"), "petId");
        assert_eq!(property_key("X-Currency"), "\"X-Currency\"");
        assert_eq!(accessor("petId"), "parameters.petId");
        assert_eq!(accessor("X-Currency"), "parameters[\"X-Currency\"]");
        assert_eq!(accessor("1st"), "parameters[\"1st\"]");
    }

    #[test]
    fn test_path_expression() {
        let params = vec![param("petId", ParameterLocation::Path, true)];
        assert_eq!(
            path_expression("/pets/{petId}/photo", &params),
            "/pets/${encodeURIComponent(String(parameters.petId))}/photo"
        );
        assert_eq!(path_expression("/plain", &[]), "/plain");
    }

    #[test]
    fn test_params_signature() {
        assert_eq!(params_signature(&[]), "options?: RequestOptions");
        assert_eq!(
            params_signature(&[param("q", ParameterLocation::Query, false)]),
            "parameters: { q?: string } = {}, options?: RequestOptions"
        );
        assert_eq!(
            params_signature(&[
                param("id", ParameterLocation::Path, true),
                param("X-Trace", ParameterLocation::Header, false),
            ]),
            "parameters: { id: string; \"X-Trace\"?: string }, options?: RequestOptions"
        );
    }

    #[test]
    fn test_operation_parameter_overrides_shared() {
        let spec = SwaggerDocument::default();
        let shared = vec![ParameterOrRef::Parameter(param(
            "id",
            ParameterLocation::Path,
            false,
        ))];
        let own = vec![ParameterOrRef::Parameter(param("id", ParameterLocation::Path, true))];
        let merged = merge_parameters(&spec, &shared, &own).unwrap();
        assert_eq!(merged.len(), 1);
        assert!(merged[0].required);
    }

    #[test]
    fn test_unresolved_reference() {
        let spec = SwaggerDocument::default();
        let err = resolve_parameter(
            &spec,
            &ParameterOrRef::Ref {
                ref_path: "#/parameters/missing".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, TypeScriptError::UnresolvedParameter(_)));
    }

    #[test]
    fn test_return_type() {
        let op: Operation = serde_json::from_value(json!({
            "responses": {
                "404": {"description": "missing"},
                "200": {"description": "ok", "schema": {"type": "array", "items": {"type": "string"}}},
            }
        }))
        .unwrap();
        assert_eq!(return_type(&op), "string[]");

        let op: Operation =
            serde_json::from_value(json!({"responses": {"204": {"description": "gone"}}})).unwrap();
        assert_eq!(return_type(&op), "void");

        assert_eq!(return_type(&Operation::default()), "unknown");
    }

    #[test]
    fn test_unique_method_name() {
        let mut seen = HashSet::new();
        assert_eq!(unique_method_name(&mut seen, "getUser"), "getUser");
        assert_eq!(unique_method_name(&mut seen, "getUser"), "getUser2");
        assert_eq!(unique_method_name(&mut seen, "getUser2"), "getUser22");
        assert_eq!(unique_method_name(&mut seen, "getUser"), "getUser3");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("Waiter\nIncome\r\n API".to_string()), "Waiter Income API");
    }

    #[test]
    fn test_escape_jsdoc() {
        assert_eq!(escape_jsdoc("a */ b".to_string()), "a *\\/ b");
    }
}
