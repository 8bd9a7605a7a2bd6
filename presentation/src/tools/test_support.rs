//! Fixtures for tool and server tests

use super::KnowledgeTools;
use stackgate_application::QueryKnowledgeUseCase;
use stackgate_application::use_cases::test_support::StubGateway;
use stackgate_domain::{Answer, PostId, Question};
use std::sync::Arc;

pub fn question(id: PostId, score: i64) -> Question {
    Question {
        question_id: id,
        title: format!("Question {}", id),
        body: format!("<p>Body of {}</p>", id),
        score,
        answer_count: 1,
        link: format!("https://stackoverflow.com/q/{}", id),
        ..Default::default()
    }
}

/// Serve `questions` from search and lookup, each with one accepted answer
pub fn stub_with(questions: Vec<Question>) -> StubGateway {
    let mut gateway = StubGateway::new().with_search_results(questions.clone());
    for question in questions {
        let id = question.question_id;
        gateway = gateway.with_question(question).with_answers(
            id,
            vec![Answer {
                answer_id: id * 10,
                question_id: id,
                score: 1,
                is_accepted: true,
                body: "<p>An answer</p>".to_string(),
                ..Default::default()
            }],
        );
    }
    gateway
}

pub fn tools_for(gateway: StubGateway) -> (Arc<StubGateway>, KnowledgeTools) {
    let gateway = Arc::new(gateway);
    let use_case = QueryKnowledgeUseCase::new(gateway.clone());
    (gateway, KnowledgeTools::new(use_case))
}
