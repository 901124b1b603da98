//! Agent definitions used by the content, chat and media services

use super::{Agent, OutputKind};

pub const COURSE_SCHEDULE_EXTRACTOR: Agent = Agent {
    name: "Course Schedule Extractor",
    model: "gpt-4o-mini",
    temperature: Some(0.1),
    output: OutputKind::Json,
    web_search: false,
    instructions: "Extract only the lecture topics from the following course schedule. \
Leave out exams, holidays, course introductions, discussion events and anything that is not course material. \
Respond with a JSON object of the form {\"topics\": [\"<topic>\", ...]}.",
};

pub const SUBTOPICS_EXTRACTOR: Agent = Agent {
    name: "Subtopics Extractor",
    model: "gpt-4o-mini",
    temperature: Some(0.1),
    output: OutputKind::Json,
    web_search: false,
    instructions: "For the given lecture topic, list the relevant subtopics. \
Respond with a JSON object with \"topic\" set to the main topic name and \"subtopics\" set to a list of subtopic names.",
};

pub const SUBTOPIC_EXPLAINER: Agent = Agent {
    name: "Subtopic Explainer",
    model: "gpt-4o-mini",
    temperature: Some(0.7),
    output: OutputKind::Json,
    web_search: false,
    instructions: "Write a detailed explanation of the given subtopic in Markdown.\n\n\
Explain what this subtopic is about in depth, but do not discuss the other subtopics of the topic (they are listed for reference). \
Focus on this subtopic only and keep the information clear and structured.\n\n\
Respond with a JSON object with the keys \"topic\", \"subtopic\" and \"explanation\".",
};

pub const QUESTION_GENERATOR: Agent = Agent {
    name: "Question Generator",
    model: "gpt-4o",
    temperature: Some(0.7),
    output: OutputKind::Json,
    web_search: false,
    instructions: "Write a detailed question in Markdown about the given subtopic.\n\n\
The question must match the requested difficulty (Easy, Medium or Hard) and question type (Multiple Choice or Open Answer).\n\n\
For \"Multiple Choice\":\n\
- put every option (\"A. ...\", \"B. ...\", ...) in the \"answers\" array\n\
- set \"correct_answer\" to the matching option\n\
- explain the correct answer in \"explanation\"\n\n\
For \"Open Answer\":\n\
- \"answers\" must be an empty array\n\
- \"correct_answer\" must be an empty string\n\
- still provide an \"explanation\"\n\n\
Use the provided explanation as context and stay on the given subtopic; do not mention the other subtopics.\n\n\
Respond with a JSON object with the keys \"topic\", \"subtopic\", \"difficulty\", \"question_type\", \"question\", \
\"answers\", \"correct_answer\" and \"explanation\".",
};

pub const COURSE_CONTENT_EXTRACTOR: Agent = Agent {
    name: "Course Content Extractor",
    model: "gpt-4o",
    temperature: Some(0.1),
    output: OutputKind::Json,
    web_search: false,
    instructions: "Extract the following details from the provided course schedule:\n\
1. The lecture topics as a list of strings (leave out exams, holidays, course introductions, discussion events and other non-course material).\n\
2. A short description summarizing what the course covers.\n\
3. The recommended reading materials as a list of strings.\n\
Respond with a JSON object with the keys \"topics\", \"description\" and \"reading_materials\".",
};

pub const BOOK_TOC_SEARCHER: Agent = Agent {
    name: "Book TOC Searcher",
    model: "gpt-4o-search-preview",
    temperature: None,
    output: OutputKind::Json,
    web_search: true,
    instructions: "You find the table of contents of books. \
Given a book title, search the web for its table of contents. \
Respond with a JSON object with \"book\" set to the given title and \"table_of_contents\" set to the list of chapter titles (empty when none were found).",
};

pub const IMAGE_SEARCHER: Agent = Agent {
    name: "Image Searcher",
    model: "gpt-4o-search-preview",
    temperature: None,
    output: OutputKind::Json,
    web_search: true,
    instructions: "You search the web for images. \
Given an image description, find a relevant image online. \
Respond with a JSON object with \"image_url\" set to a direct link to the image that best matches the description.",
};

pub const CHAT_ASSISTANT: Agent = Agent {
    name: "Chat Assistant",
    model: "gpt-4o",
    temperature: Some(0.7),
    output: OutputKind::Text,
    web_search: false,
    instructions: "You are a helpful assistant. Given the conversation context provided, \
produce a clear and helpful reply to the latest user message.",
};

pub const STRUCTURED_CHAT_ASSISTANT: Agent = Agent {
    name: "Structured Chat Assistant",
    model: "gpt-4o-mini",
    temperature: Some(0.7),
    output: OutputKind::Json,
    web_search: false,
    instructions: "You are a helpful AI assistant. Reply to the user conversationally and keep the context of the earlier conversation in mind.\n\n\
Respond with a JSON object with \"role\" set to \"assistant\" and \"content\" set to your reply.",
};

pub const CONVERSATION_SUMMARIZER: Agent = Agent {
    name: "Conversation Summarizer",
    model: "gpt-4o",
    temperature: Some(0.0),
    output: OutputKind::Text,
    web_search: false,
    instructions: "Progressively summarize the lines of conversation provided, adding onto the previous summary and returning a new summary. \
Keep facts, names and open questions; drop pleasantries. Reply with the new summary only.",
};

pub const SUBTOPIC_RESEARCHER: Agent = Agent {
    name: "Subtopic Research Agent",
    model: "gpt-4o",
    temperature: Some(0.0),
    output: OutputKind::Text,
    web_search: false,
    instructions: "You answer questions about course material. \
Use the query_subtopics tool to look up subtopics similar to the question before answering, \
and ground your answer in the returned subtopic texts. Answer in plain text.",
};

pub const AXODRAW_DIAGRAM_GENERATOR: Agent = Agent {
    name: "Axodraw Diagram Generator",
    model: "o3-mini",
    temperature: None,
    output: OutputKind::Text,
    web_search: false,
    instructions: include_str!("axodraw_instructions.md"),
};
