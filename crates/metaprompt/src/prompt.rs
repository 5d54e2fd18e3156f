//! Built-in prompt text: the default meta prompt both editors start from,
//! the label prefixed to user content, and the example test input.

/// Prefix for the user-role message sent alongside a meta prompt.
pub const TASK_LABEL: &str = "Task, Goal, or Current Prompt:\n";

/// Meta prompt loaded into both editors on startup and by "reset".
pub const DEFAULT_META_PROMPT: &str = "\
Given a task description or an existing prompt, produce a detailed system prompt \
that guides a language model to complete the task effectively.

# Guidelines

- Understand the task: identify the objective, the expected output, and any \
constraints or requirements.
- Make minimal changes: if an existing prompt is provided, improve it only where \
it is unclear or incomplete. Keep the original structure when it works.
- Reasoning before conclusions: make sure the prompt asks for reasoning steps \
before any conclusion is reached. Never start the output with the conclusion.
- Examples: include high-quality examples when they help. Use placeholders \
in [square brackets] for complex elements.
- Clarity and conciseness: use clear, specific language. Avoid unnecessary \
instructions or bland statements.
- Formatting: use markdown features for readability.
- Output format: state explicitly what the output should look like, including \
length and syntax (JSON, short sentence, paragraph, and so on).

# Output Format

First think through the task inside <reasoning></reasoning> tags: what is being \
asked, what is missing from any existing prompt, and what the improved prompt \
must contain. Then output the completed system prompt verbatim, without \
additional commentary or code fences.";

/// Example test input offered by the "load example" action.
pub const EXAMPLE_TEST_INPUT: &str = "\
Create a system prompt for an AI assistant that helps users write effective emails.

The assistant should:
1. Help users craft professional emails with clear subject lines
2. Suggest appropriate greetings and closings based on the context
3. Provide templates for common email types (request, follow-up, introduction)
4. Offer guidance on tone and formality based on the recipient
5. Help with proofreading and suggesting improvements

The assistant should be friendly, helpful, and focus on making email writing easier and more effective.";
