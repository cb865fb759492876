use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Client {
    Table,
    Id,
    Name,
    Phone,
    Address,
    Neighborhood,
    GeoLat,
    GeoLng,
    FixedPrice,
    PaymentDueDay,
    LastSandChange,
    Active,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum ServiceTemplate {
    Table,
    Id,
    ClientId,
    DayOfWeek,
    ServiceType,
    IsActive,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum ServiceInstance {
    Table,
    Id,
    TemplateId,
    ClientId,
    ScheduledDate,
    Status,
    VisitStart,
    Price,
    ServiceType,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Expense {
    Table,
    Id,
    ServiceInstanceId,
    Description,
    Amount,
    ExpenseDate,
    Category,
    CreatedAt,
}
