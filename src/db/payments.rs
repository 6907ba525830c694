use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::models::{Payment, PaymentQuery};

pub async fn insert_payment<'e, E: SqliteExecutor<'e>>(db: E, payment: &Payment) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO payments
            (id, course_id, student_id, student_name, amount, status, payment_method,
            payment_date, transaction_id, notes)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&payment.id)
    .bind(&payment.course_id)
    .bind(&payment.student_id)
    .bind(&payment.student_name)
    .bind(payment.amount)
    .bind(payment.status)
    .bind(&payment.payment_method)
    .bind(&payment.payment_date)
    .bind(&payment.transaction_id)
    .bind(&payment.notes)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_payment_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: &str) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list_payments<'e, E: SqliteExecutor<'e>>(db: E, query: &PaymentQuery) -> Result<Vec<Payment>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM payments WHERE 1 = 1");
    if let Some(course_id) = &query.course_id {
        qb.push(" AND course_id = ").push_bind(course_id.clone());
    }
    if let Some(student_id) = &query.student_id {
        qb.push(" AND student_id = ").push_bind(student_id.clone());
    }
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status);
    }
    qb.push(" ORDER BY payment_date DESC");

    qb.build_query_as::<Payment>().fetch_all(db).await
}

/// Every payment made for courses taught by `teacher_id`.
pub async fn payments_for_teacher<'e, E: SqliteExecutor<'e>>(db: E, teacher_id: &str) -> Result<Vec<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        r#"
        SELECT p.*
        FROM payments p
        JOIN courses c ON c.id = p.course_id
        WHERE c.teacher_id = ?
        ORDER BY p.payment_date DESC
        "#,
    )
    .bind(teacher_id)
    .fetch_all(db)
    .await
}

pub async fn has_completed_payment<'e, E: SqliteExecutor<'e>>(
    db: E,
    course_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM payments WHERE course_id = ?1 AND student_id = ?2 AND status = 'completed' LIMIT 1",
    )
    .bind(course_id)
    .bind(student_id)
    .fetch_optional(db)
    .await?;

    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{seed_course, seed_user, setup_test_db};
    use crate::models::{PaymentStatus, Role};

    fn payment(course_id: &str, student_id: &str, status: PaymentStatus) -> Payment {
        Payment {
            id: crate::db::new_id(),
            course_id: course_id.to_string(),
            student_id: student_id.to_string(),
            student_name: "Ann".to_string(),
            amount: 49.0,
            status,
            payment_method: "qr_code".to_string(),
            payment_date: crate::db::now(),
            transaction_id: format!("TXN_{}", crate::db::new_id()),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_one_completed_payment_per_student_and_course() {
        let pool = setup_test_db().await;
        let teacher = seed_user(&pool, "Tina", Role::Teacher).await;
        let ann = seed_user(&pool, "Ann", Role::Student).await;
        let course = seed_course(&pool, &teacher, None).await;

        // failed attempts do not block a later payment
        insert_payment(&pool, &payment(&course.id, &ann.id, PaymentStatus::Failed)).await.unwrap();
        insert_payment(&pool, &payment(&course.id, &ann.id, PaymentStatus::Completed)).await.unwrap();

        let err = insert_payment(&pool, &payment(&course.id, &ann.id, PaymentStatus::Completed))
            .await
            .unwrap_err();
        assert!(matches!(err, sqlx::Error::Database(ref db) if db.is_unique_violation()));
        assert!(has_completed_payment(&pool, &course.id, &ann.id).await.unwrap());
    }
}
