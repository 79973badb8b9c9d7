use std::fmt;

/// Identifies one cached gateway read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Households,
    MilkTypes,
    Holidays,
    /// Delivery entries for one month (YYYY-MM)
    DeliveriesForMonth(String),
    /// Gateway-computed totals for one month (YYYY-MM)
    MonthlySummary(String),
    CallerProfile,
    CallerRole,
}

impl QueryKey {
    /// Month-scoped keys are disabled until a month is chosen
    pub fn is_enabled(&self) -> bool {
        match self {
            QueryKey::DeliveriesForMonth(month) | QueryKey::MonthlySummary(month) => !month.is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Households => write!(f, "households"),
            QueryKey::MilkTypes => write!(f, "milkTypes"),
            QueryKey::Holidays => write!(f, "holidays"),
            QueryKey::DeliveriesForMonth(month) => write!(f, "deliveries/month/{}", month),
            QueryKey::MonthlySummary(month) => write!(f, "monthlySummary/{}", month),
            QueryKey::CallerProfile => write!(f, "callerProfile"),
            QueryKey::CallerRole => write!(f, "callerRole"),
        }
    }
}

/// A write against the gateway, named by what it touches
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateHousehold,
    UpdateHousehold,
    DeleteHousehold,
    CreateMilkType,
    UpdateMilkType,
    DeleteMilkType,
    MarkHoliday,
    UnmarkHoliday,
    /// Month is derived from the entry's date
    AddDelivery { month: String },
    /// Month is derived from the entry's date
    UpdateDelivery { month: String },
    /// Month is supplied by the caller, since only the id is sent
    DeleteDelivery { month: String },
    SaveProfile,
}

impl Mutation {
    /// Keys whose cached values are stale once this mutation succeeds
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            Mutation::CreateHousehold | Mutation::UpdateHousehold | Mutation::DeleteHousehold => {
                vec![QueryKey::Households]
            }
            Mutation::CreateMilkType | Mutation::UpdateMilkType | Mutation::DeleteMilkType => {
                vec![QueryKey::MilkTypes]
            }
            Mutation::MarkHoliday | Mutation::UnmarkHoliday => vec![QueryKey::Holidays],
            Mutation::AddDelivery { month }
            | Mutation::UpdateDelivery { month }
            | Mutation::DeleteDelivery { month } => vec![
                QueryKey::DeliveriesForMonth(month.clone()),
                QueryKey::MonthlySummary(month.clone()),
            ],
            Mutation::SaveProfile => vec![QueryKey::CallerProfile],
        }
    }
}
