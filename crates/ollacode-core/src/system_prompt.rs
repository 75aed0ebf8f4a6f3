//! System prompt describing the action protocol to the model.

use ollacode_tools::ToolSpec;
use serde_json::{json, Value};
use std::fmt::Write;

const INTRO: &str = "You are a coding assistant working inside the user's project directory. \
You can inspect and change the project only through the tools listed below.";

const PROTOCOL: &str = r#"## Calling a tool

To use a tool, write a JSON object in a fenced json code block:

```json
{
  "tool": "tool_name",
  "args": {
    "name": "value"
  }
}
```

You may write several tool calls in one reply. They run in order and their results are sent back to you in the next message."#;

const GUIDELINES: &str = r#"## How to work

1. Read the task carefully and decide what needs to change.
2. Say briefly what you are about to do, then call the tools that do it.
3. Look at each tool result before deciding the next step.
4. When a tool fails, fix the cause or explain what is wrong.
5. Keep explanations short.
6. Call "done" with a summary as soon as the task is finished.

## Safety

- Only touch files inside the project directory. Paths are relative to the project root.
- Secrets such as .env files and SSH keys cannot be read or written.
- The user approves every shell command before it runs; destructive commands are refused.
- If you are unsure whether a command is safe, say so instead of running it.

## Replies

A reply can be plain text, tool calls, or both. Only JSON tool calls are executed.
Always finish by calling the "done" tool."#;

/// Render the system prompt for the given tools.
pub fn build(tools: &[ToolSpec]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "{}\n", INTRO);
    let _ = writeln!(prompt, "{}\n", PROTOCOL);
    let _ = writeln!(prompt, "## Tools\n");

    for (index, tool) in tools.iter().enumerate() {
        let _ = writeln!(prompt, "### {}. {}", index + 1, tool.name);
        let _ = writeln!(prompt, "{}\n", tool.description);

        let arguments = describe_arguments(&tool.parameters);
        if !arguments.is_empty() {
            let _ = writeln!(prompt, "Arguments:");
            for line in arguments {
                let _ = writeln!(prompt, "- {}", line);
            }
            prompt.push('\n');
        }

        let example = json!({"tool": tool.name, "args": tool.example});
        let rendered = serde_json::to_string_pretty(&example).unwrap_or_default();
        let _ = writeln!(prompt, "Example:\n```json\n{}\n```\n", rendered);
    }

    prompt.push_str(GUIDELINES);
    prompt
}

fn describe_arguments(schema: &Value) -> Vec<String> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, property)| {
            let kind = property.get("type").and_then(Value::as_str).unwrap_or("any");
            let necessity = if required.contains(&name.as_str()) {
                "required"
            } else {
                "optional"
            };
            match property.get("description").and_then(Value::as_str) {
                Some(description) => format!("{} ({}, {}): {}", name, kind, necessity, description),
                None => format!("{} ({}, {})", name, kind, necessity),
            }
        })
        .collect()
}
