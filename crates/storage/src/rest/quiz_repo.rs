use async_trait::async_trait;
use reqwest::Method;
use wordify_core::model::{QuizQuestion, QuizSessionId, QuizSessionRecord, TopicId, UserId};

use super::RestRepository;
use super::wire::{
    GenerateBody, GenerateResponse, ListBody, QuestionOut, SessionDto, SubmitBody, SubmitResponse,
};
use crate::repository::{QuizRepository, QuizSubmission, StorageError};

#[async_trait]
impl QuizRepository for RestRepository {
    async fn generate_quiz(
        &self,
        topic_id: &TopicId,
        question_count: u32,
    ) -> Result<Vec<QuizQuestion>, StorageError> {
        let response: GenerateResponse = self
            .send_json(
                Method::POST,
                self.endpoint("quizzes/generate/")?,
                &GenerateBody {
                    topic_id,
                    question_count,
                },
            )
            .await?;

        response
            .questions
            .into_iter()
            .map(|q| {
                let id = q.id.clone();
                q.into_question().ok_or_else(|| {
                    StorageError::Decode(format!("generated question {id} has no vocabulary"))
                })
            })
            .collect()
    }

    async fn submit_quiz(
        &self,
        _user: &UserId,
        submission: &QuizSubmission,
    ) -> Result<QuizSessionRecord, StorageError> {
        let body = SubmitBody {
            topic_id: &submission.topic_id,
            questions: submission.questions.iter().map(QuestionOut::from).collect(),
            time_spent: submission.time_spent_secs,
        };
        let response: SubmitResponse = self
            .send_json(Method::POST, self.endpoint("quizzes/submit/")?, &body)
            .await?;
        Ok(response.session.into())
    }

    async fn quiz_history(&self, _user: &UserId) -> Result<Vec<QuizSessionRecord>, StorageError> {
        let list: ListBody<SessionDto> = self.get_json(self.endpoint("quizzes/history/")?).await?;
        Ok(list.into_vec().into_iter().map(QuizSessionRecord::from).collect())
    }

    async fn quiz_session(
        &self,
        _user: &UserId,
        id: &QuizSessionId,
    ) -> Result<QuizSessionRecord, StorageError> {
        let dto: SessionDto = self
            .get_json(self.endpoint(&format!("quizzes/{id}/"))?)
            .await?;
        Ok(dto.into())
    }
}
