use serde_json::json;
use tiny_tools_rs::{
    tools::{CalculatorTool, WeatherTool},
    FunctionFactory, Tool, ToolError, ToolOutcome, ToolRegistry,
};

#[test]
fn test_registry_lists_tools_in_name_order() {
    let mut registry = ToolRegistry::new();
    registry.register(WeatherTool::new());
    registry.register(CalculatorTool::new());

    assert_eq!(registry.names(), vec!["calculate", "get_weather"]);
    assert_eq!(registry.list().len(), 2);
    assert!(registry.get("calculate").is_some());
    assert!(registry.get("missing").is_none());
}

async fn evaluate(expression: &str) -> Result<serde_json::Value, ToolError> {
    CalculatorTool::new()
        .execute(json!({ "expression": expression }))
        .await
}

#[tokio::test]
async fn test_calculator_precedence_and_grouping() {
    let result = evaluate("2 + 3 * (4 - 1)").await.unwrap();
    assert_eq!(result["expression"], "2 + 3 * (4 - 1)");
    assert_eq!(result["result"], json!(11));
}

#[tokio::test]
async fn test_calculator_integer_vs_float_results() {
    assert_eq!(evaluate("10 / 2").await.unwrap()["result"], json!(5));
    assert_eq!(evaluate("7 / 2").await.unwrap()["result"], json!(3.5));
    assert_eq!(evaluate("7 % 3").await.unwrap()["result"], json!(1));
}

#[tokio::test]
async fn test_calculator_is_deterministic() {
    let first = evaluate("1 + 2 * 3 - 4 / 2").await.unwrap();
    let second = evaluate("1 + 2 * 3 - 4 / 2").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_calculator_division_by_zero() {
    assert!(matches!(
        evaluate("10 / 0").await,
        Err(ToolError::DivisionByZero)
    ));
    assert!(matches!(
        evaluate("7 % 0").await,
        Err(ToolError::DivisionByZero)
    ));
}

#[tokio::test]
async fn test_calculator_rejects_code_injection() {
    for expression in ["__import__('os')", "a=1", "2 + x", "print(1)"] {
        assert!(
            matches!(
                evaluate(expression).await,
                Err(ToolError::InvalidExpression(_))
            ),
            "expected InvalidExpression for {:?}",
            expression
        );
    }
}

#[tokio::test]
async fn test_calculator_rejects_empty_expression() {
    assert!(matches!(
        evaluate("").await,
        Err(ToolError::InvalidArgument(_))
    ));
    assert!(matches!(
        evaluate("   ").await,
        Err(ToolError::InvalidArgument(_))
    ));
}

fn provider_body() -> String {
    json!({
        "current_condition": [{
            "temp_C": "18",
            "temp_F": "64",
            "weatherDesc": [{ "value": "Partly cloudy" }]
        }],
        "nearest_area": [{ "areaName": [{ "value": "Paris" }] }]
    })
    .to_string()
}

#[tokio::test]
async fn test_weather_maps_provider_report() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/Paris?format=j1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(provider_body())
        .create_async()
        .await;

    let tool = WeatherTool::with_base_url(server.url());
    let result = tool.execute(json!({ "location": "Paris" })).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result["location"], "Paris");
    assert_eq!(result["temperature"], 18.0);
    assert_eq!(result["unit"], "celsius");
    assert_eq!(result["condition"], "Partly cloudy");
}

#[tokio::test]
async fn test_weather_fahrenheit_unit() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/Paris?format=j1")
        .with_status(200)
        .with_body(provider_body())
        .create_async()
        .await;

    let tool = WeatherTool::with_base_url(server.url());
    let result = tool
        .execute(json!({ "location": "Paris", "unit": "fahrenheit" }))
        .await
        .unwrap();

    assert_eq!(result["temperature"], 64.0);
    assert_eq!(result["unit"], "fahrenheit");
}

#[tokio::test]
async fn test_weather_upstream_error_carries_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/Nowhereistan?format=j1")
        .with_status(404)
        .create_async()
        .await;

    let tool = WeatherTool::with_base_url(server.url());
    let err = tool
        .execute(json!({ "location": "Nowhereistan" }))
        .await
        .unwrap_err();

    match err {
        ToolError::UpstreamError { status, .. } => assert_eq!(status, Some(404)),
        other => panic!("expected UpstreamError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_weather_unparseable_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/Paris?format=j1")
        .with_status(200)
        .with_body("not json at all")
        .create_async()
        .await;

    let tool = WeatherTool::with_base_url(server.url());
    let err = tool.execute(json!({ "location": "Paris" })).await.unwrap_err();

    assert!(matches!(
        err,
        ToolError::UpstreamError { status: None, .. }
    ));
}

#[tokio::test]
async fn test_weather_reserved_characters_stay_in_path_segment() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/Paris%2Fx%3Fy%23z?format=j1")
        .with_status(200)
        .with_body(provider_body())
        .create_async()
        .await;

    let tool = WeatherTool::with_base_url(server.url());
    let result = tool
        .execute(json!({ "location": "Paris/x?y#z" }))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result["location"], "Paris");
}

#[tokio::test]
async fn test_weather_body_timeout_is_unavailable() {
    use std::io::Write;

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/Paris?format=j1")
        .with_status(200)
        .with_chunked_body(|writer| {
            writer.write_all(b"{")?;
            writer.flush()?;
            std::thread::sleep(std::time::Duration::from_millis(500));
            writer.write_all(b"}")
        })
        .create_async()
        .await;

    let tool = WeatherTool::with_base_url(server.url())
        .with_timeout(std::time::Duration::from_millis(100));
    let err = tool.execute(json!({ "location": "Paris" })).await.unwrap_err();

    assert!(matches!(err, ToolError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_weather_empty_location_skips_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let tool = WeatherTool::with_base_url(server.url());
    let err = tool.execute(json!({ "location": "   " })).await.unwrap_err();

    assert!(matches!(err, ToolError::InvalidArgument(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_weather_unreachable_provider() {
    // Nothing listens on this port
    let tool = WeatherTool::with_base_url("http://127.0.0.1:1");
    let err = tool.execute(json!({ "location": "Paris" })).await.unwrap_err();

    assert!(matches!(err, ToolError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_function_factory_registration_and_dispatch() {
    let mut factory = FunctionFactory::new();
    factory.register_tool(CalculatorTool::new());
    factory.register_tool(WeatherTool::new());

    assert!(factory.has_function("calculate"));
    assert!(factory.has_function("get_weather"));
    assert!(!factory.has_function("nonexistent"));

    let outcome = factory
        .dispatch("calculate", json!({ "expression": "4 * 5" }))
        .await;
    assert!(outcome.is_success());
    assert_eq!(outcome.data().unwrap()["result"], json!(20));
}

#[tokio::test]
async fn test_dispatch_folds_errors_into_outcome() {
    let mut factory = FunctionFactory::new();
    factory.register_tool(CalculatorTool::new());

    let outcome = factory
        .dispatch("calculate", json!({ "expression": "10 / 0" }))
        .await;
    match outcome {
        ToolOutcome::Error { error } => assert_eq!(error.code, "DIVISION_BY_ZERO"),
        other => panic!("expected error outcome, got {:?}", other),
    }

    let outcome = factory.dispatch("no_such_tool", json!({})).await;
    match outcome {
        ToolOutcome::Error { error } => assert_eq!(error.code, "TOOL_NOT_FOUND"),
        other => panic!("expected error outcome, got {:?}", other),
    }
}

#[test]
fn test_tool_schemas_expose_single_string_argument() {
    let calculator = CalculatorTool::new();
    let weather = WeatherTool::new();

    let calc_schema = calculator.parameters_schema();
    assert_eq!(calc_schema["properties"]["expression"]["type"], "string");
    assert_eq!(calc_schema["required"], json!(["expression"]));

    let weather_schema = weather.parameters_schema();
    assert_eq!(weather_schema["properties"]["location"]["type"], "string");
    assert_eq!(weather_schema["required"], json!(["location"]));
}

#[test]
fn test_openai_tool_listing() {
    let mut factory = FunctionFactory::new();
    factory.register_tool(CalculatorTool::new());
    factory.register_tool(WeatherTool::new());

    let tools = factory.get_openai_tools();
    assert_eq!(tools.len(), 2);

    let names: Vec<&str> = tools
        .iter()
        .map(|tool| tool["function"]["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"calculate"));
    assert!(names.contains(&"get_weather"));
    for tool in &tools {
        assert_eq!(tool["type"], "function");
    }
}
