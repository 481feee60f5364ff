use minijinja::Environment;

use super::error::Error;

/// All template sources, registered by the names Sections bind against.
///
/// Sources are consts: the set of templates is fixed at build time, only the
/// data bound to them varies. A parse failure is a generator bug, surfaced
/// as the fatal internal error kind.
const TEMPLATES: &[(&str, &str)] = &[
    ("header", HEADER_T),
    ("client_struct", CLIENT_STRUCT_T),
    ("client_init", CLIENT_INIT_T),
    ("client_endpoint", CLIENT_ENDPOINT_T),
    ("request_encoder", REQUEST_ENCODER_T),
    ("response_decoder", RESPONSE_DECODER_T),
    ("openapi", OPENAPI_T),
];

/// Build the template environment used by the generation driver.
pub fn environment() -> Result<Environment<'static>, Error> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    for (name, source) in TEMPLATES {
        env.add_template(name, source)
            .map_err(|err| Error::Internal(format!("template \"{}\" failed to parse: {}", name, err)))?;
    }
    Ok(env)
}

// input: {title, imports: [{path, alias?}]}
const HEADER_T: &str = r#"// Code generated by apiforge, DO NOT EDIT.
//
// {{ title }}

{% for imp in imports %}use {{ imp.path }}{% if imp.alias %} as {{ imp.alias }}{% endif %};
{% endfor %}
"#;

// input: service data
const CLIENT_STRUCT_T: &str = r#"/// HTTP clients for the {{ name }} service endpoints.
pub struct {{ client_struct }} {
    scheme: String,
    host: String,
}
"#;

// input: service data
const CLIENT_INIT_T: &str = r#"
impl {{ client_struct }} {
    /// Instantiates HTTP clients for all the {{ name }} service servers.
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }
}
"#;

// input: endpoint data
const CLIENT_ENDPOINT_T: &str = r#"
impl {{ client_struct }} {
    /// Makes HTTP requests to the {{ service_name }} service {{ method.name }} server.
    pub fn {{ method.fn_name }}(&self{% if method.has_payload %}, payload: &{{ method.payload_type }}{% endif %}) -> Result<{% if method.has_result %}{{ method.result_type }}{% else %}(){% endif %}, TransportError> {
        let url = format!("{}://{}{}", self.scheme, self.host, "{{ path }}");
        let req = {{ method.fn_name }}_request(&url{% if method.has_payload %}, payload{% endif %})?;
        let resp = send(req)?;
        {% if method.has_decoder %}decode_{{ method.fn_name }}_response(resp){% else %}expect_no_content(resp){% endif %}
    }
}
"#;

// input: endpoint data
const REQUEST_ENCODER_T: &str = r#"
/// Encodes requests sent to the {{ service_name }} {{ method.name }} server.
pub fn {{ method.fn_name }}_request(url: &str{% if method.has_payload %}, payload: &{{ method.payload_type }}{% endif %}) -> Result<Request, TransportError> {
    let mut req = Request::post(url);
{% if method.has_payload %}    req.set_json(payload)
        .map_err(|err| TransportError::encoding("{{ service_name }}", "{{ method.name }}", err))?;
{% endif %}    Ok(req)
}
"#;

// input: endpoint data
const RESPONSE_DECODER_T: &str = r#"
/// Decodes responses returned by the {{ service_name }} {{ method.name }} endpoint.
pub fn decode_{{ method.fn_name }}_response(resp: Response) -> Result<{% if method.has_result %}{{ method.result_type }}{% else %}(){% endif %}, TransportError> {
    match resp.status() {
        200 => {% if method.has_result %}resp
            .json()
            .map_err(|err| TransportError::decoding("{{ service_name }}", "{{ method.name }}", err)),{% else %}Ok(()),{% endif %}
{% for error in method.errors %}        {{ error.status }} => Err(TransportError::endpoint("{{ service_name }}", "{{ method.name }}", "{{ error.name }}")),
{% endfor %}        status => Err(TransportError::invalid_response("{{ service_name }}", "{{ method.name }}", status)),
    }
}
"#;

// input: {json}
const OPENAPI_T: &str = "{{ json }}\n";
