use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum ClientOrder {
    Table,
    Id,
    ClientId,
    ClientName,
    StartDate,
    Duration,
    DaysCount,
    EndDate,
    CreditDays,
    Status,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Cancellation {
    Table,
    ClientId,
    OrderId,
    Date,
    CreditApplied,
    CancelledAt,
}

#[derive(Iden, Clone)]
pub enum MealSelection {
    Table,
    ClientId,
    OrderId,
    Date,
    Meal,
    CreatedAt,
}
